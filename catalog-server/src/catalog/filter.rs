//! Product listing filter payload
//!
//! `filters` arrives as a JSON object in the query string. Recognized keys
//! are `is_promotion`, `condition` and the legacy `is_used`; every other key
//! filters on the product extra-attribute of the same name.

use crate::config::FilterMode;
use serde_json::{Map, Value};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ProductCondition;
use shared::models::serde_helpers::parse_bool_str;

/// Restriction on one extra-attribute key: its value must be one of `candidates`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub key: String,
    /// Values in their text form (see [`candidate_text`])
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub is_promotion: Option<bool>,
    /// `Some(empty)` matches nothing; `None` does not restrict
    pub conditions: Option<Vec<ProductCondition>>,
    pub is_used: Option<bool>,
    pub attributes: Vec<AttributeFilter>,
}

impl ProductFilters {
    pub fn is_empty(&self) -> bool {
        self.is_promotion.is_none()
            && self.conditions.is_none()
            && self.is_used.is_none()
            && self.attributes.is_empty()
    }
}

/// Text form of a JSON value as compared against stored attribute values
///
/// Strings compare by content, everything else by its JSON text, so `128`
/// and `"128"` match each other.
pub fn candidate_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::FilterInvalid, msg)
}

/// Parse the raw `filters` parameter
///
/// In [`FilterMode::Strict`] anything malformed fails with `FilterInvalid`;
/// in [`FilterMode::Lenient`] a malformed payload is logged and treated as no
/// filters, and unknown condition labels are dropped.
pub fn parse_filters(raw: Option<&str>, mode: FilterMode) -> AppResult<ProductFilters> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(ProductFilters::default());
    };

    let parsed = serde_json::from_str::<Value>(raw)
        .map_err(|e| invalid(format!("filters is not valid JSON: {e}")))
        .and_then(|value| match value {
            Value::Object(map) => Ok(map),
            _ => Err(invalid("filters must be a JSON object")),
        })
        .and_then(|map| from_map(map, mode));

    match (parsed, mode) {
        (Ok(filters), _) => Ok(filters),
        (Err(e), FilterMode::Strict) => Err(e),
        (Err(e), FilterMode::Lenient) => {
            tracing::warn!(error = %e.message, "Ignoring malformed product filters");
            Ok(ProductFilters::default())
        }
    }
}

fn from_map(map: Map<String, Value>, mode: FilterMode) -> AppResult<ProductFilters> {
    let mut filters = ProductFilters::default();

    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "is_promotion" => filters.is_promotion = Some(parse_flag(&key, &value)?),
            "is_used" => filters.is_used = Some(parse_flag(&key, &value)?),
            "condition" => filters.conditions = parse_conditions(&value, mode)?,
            _ => {
                let candidates = match value {
                    Value::Array(items) => items.iter().filter_map(candidate_text).collect(),
                    scalar => candidate_text(&scalar).into_iter().collect(),
                };
                filters.attributes.push(AttributeFilter { key, candidates });
            }
        }
    }

    Ok(filters)
}

fn parse_flag(key: &str, value: &Value) -> AppResult<bool> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool_str(s).ok().flatten(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(format!("{key} must be true or false")))
}

fn parse_conditions(value: &Value, mode: FilterMode) -> AppResult<Option<Vec<ProductCondition>>> {
    let labels: Vec<&str> = match value {
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| invalid("condition values must be strings"))
            })
            .collect::<AppResult<_>>()?,
        _ => return Err(invalid("condition must be a string or a list of strings")),
    };
    if labels.is_empty() {
        return Ok(None);
    }

    let mut conditions = Vec::with_capacity(labels.len());
    for label in labels {
        match label.parse::<ProductCondition>() {
            Ok(c) => {
                if !conditions.contains(&c) {
                    conditions.push(c);
                }
            }
            Err(e) if mode == FilterMode::Strict => return Err(invalid(e.to_string())),
            Err(e) => tracing::warn!(error = %e, "Dropping unknown condition filter"),
        }
    }
    Ok(Some(conditions))
}
