use sqlx::Sqlite;
use sqlx::query::QueryAs;

type Args<'a> = <Sqlite as sqlx::Database>::Arguments<'a>;

/// Query builder for constructing SQL queries with dynamic WHERE conditions
///
/// Conditions are joined with AND; bindings are applied in the order they
/// were pushed, so each condition must push its own placeholders' values
/// right after it.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; its placeholders are bound by the following bind_* calls
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Add a text binding
    pub fn bind_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.bindings.push(QueryValue::Text(value.into()));
        self
    }

    /// Add an integer binding
    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    /// Add a float binding
    pub fn bind_f64(&mut self, value: f64) -> &mut Self {
        self.bindings.push(QueryValue::Float(value));
        self
    }

    /// Add `field IN (?, ...)`; an empty set matches nothing
    pub fn add_in_condition<I, V>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        let values: Vec<QueryValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.conditions.push("1 = 0".to_string());
            return self;
        }
        self.conditions
            .push(format!("{} IN ({})", field, placeholders(values.len())));
        self.bindings.extend(values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn bindings(&self) -> &[QueryValue] {
        &self.bindings
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings_as<'a, O>(
        &self,
        mut query: QueryAs<'a, Sqlite, O, Args<'a>>,
    ) -> QueryAs<'a, Sqlite, O, Args<'a>> {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.clone()),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }
}

/// `?, ?, ?` with `n` placeholders
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
