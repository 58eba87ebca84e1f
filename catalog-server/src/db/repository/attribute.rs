//! Attribute Repository
//!
//! Attribute definitions are owned by exactly one category or subcategory.
//! Nested attribute lists on category/subcategory writes go through
//! [`sync_scope`] inside the parent's transaction.

use super::{RepoError, RepoResult};
use crate::utils::query_builder::placeholders;
use shared::models::{Attribute, AttributeInput, AttributeScope};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashSet;

const COLUMNS: &str = "id, name, category_id, subcategory_id, is_displayable";

fn scope_column(scope: AttributeScope) -> (&'static str, i64) {
    match scope {
        AttributeScope::Category(id) => ("category_id", id),
        AttributeScope::Subcategory(id) => ("subcategory_id", id),
    }
}

fn scope_label(scope: AttributeScope) -> String {
    match scope {
        AttributeScope::Category(id) => format!("category {id}"),
        AttributeScope::Subcategory(id) => format!("subcategory {id}"),
    }
}

// ── Queries ─────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Attribute>> {
    let attr = sqlx::query_as::<_, Attribute>(&format!(
        "SELECT {COLUMNS} FROM attribute WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(attr)
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Attribute>> {
    let attrs = sqlx::query_as::<_, Attribute>(&format!(
        "SELECT {COLUMNS} FROM attribute WHERE category_id = ? ORDER BY id"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(attrs)
}

pub async fn find_by_subcategory(
    pool: &SqlitePool,
    subcategory_id: i64,
) -> RepoResult<Vec<Attribute>> {
    let attrs = sqlx::query_as::<_, Attribute>(&format!(
        "SELECT {COLUMNS} FROM attribute WHERE subcategory_id = ? ORDER BY id"
    ))
    .bind(subcategory_id)
    .fetch_all(pool)
    .await?;
    Ok(attrs)
}

/// Attributes visible from a subcategory and its category: subcategory-scoped
/// first, then category-scoped, each by id
pub async fn find_for_scope(
    pool: &SqlitePool,
    subcategory_id: Option<i64>,
    category_id: i64,
) -> RepoResult<Vec<Attribute>> {
    let attrs = sqlx::query_as::<_, Attribute>(&format!(
        "SELECT {COLUMNS} FROM attribute \
         WHERE subcategory_id = ? OR category_id = ? \
         ORDER BY CASE WHEN subcategory_id IS NOT NULL THEN 0 ELSE 1 END, id"
    ))
    .bind(subcategory_id)
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(attrs)
}

/// All attributes scoped to any of the given subcategories or categories
pub async fn find_for_scopes(
    pool: &SqlitePool,
    subcategory_ids: &[i64],
    category_ids: &[i64],
) -> RepoResult<Vec<Attribute>> {
    if subcategory_ids.is_empty() && category_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM attribute \
         WHERE subcategory_id IN ({}) OR category_id IN ({}) ORDER BY id",
        // IN () is valid in SQLite and matches nothing
        placeholders(subcategory_ids.len()),
        placeholders(category_ids.len()),
    );
    let mut query = sqlx::query_as::<_, Attribute>(&sql);
    for id in subcategory_ids.iter().chain(category_ids) {
        query = query.bind(*id);
    }
    Ok(query.fetch_all(pool).await?)
}

// ── Standalone creation ─────────────────────────────────────────────

/// Create an attribute in a scope whose owner must exist
pub async fn create(
    pool: &SqlitePool,
    scope: AttributeScope,
    name: &str,
    is_displayable: bool,
) -> RepoResult<Attribute> {
    let mut tx = pool.begin().await?;
    let (table, owner_id) = match scope {
        AttributeScope::Category(id) => ("category", id),
        AttributeScope::Subcategory(id) => ("subcategory", id),
    };
    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE id = ?"))
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!(
            "{} not found",
            capitalize(table)
        )));
    }
    let id = insert(&mut tx, scope, name, is_displayable).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attribute".into()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn insert(
    conn: &mut SqliteConnection,
    scope: AttributeScope,
    name: &str,
    is_displayable: bool,
) -> RepoResult<i64> {
    let (column, owner_id) = scope_column(scope);
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Attribute name is required".into()));
    }
    let id: i64 = sqlx::query_scalar(&format!(
        "INSERT INTO attribute (name, {column}, is_displayable) VALUES (?, ?, ?) RETURNING id"
    ))
    .bind(name)
    .bind(owner_id)
    .bind(is_displayable)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Attribute '{name}' already exists in {}",
            scope_label(scope)
        )),
        other => other,
    })?;
    Ok(id)
}

// ── Synchronization ─────────────────────────────────────────────────

/// Replace the attribute set of a scope with `inputs`
///
/// Entries with an id update that attribute (which must belong to the
/// scope), entries without one are inserted, stored attributes not listed
/// are deleted. Runs on the caller's transaction connection so a failure
/// leaves the stored set untouched.
pub async fn sync_scope(
    conn: &mut SqliteConnection,
    scope: AttributeScope,
    inputs: &[AttributeInput],
) -> RepoResult<()> {
    let (column, owner_id) = scope_column(scope);

    let existing: HashSet<i64> =
        sqlx::query_scalar::<_, i64>(&format!("SELECT id FROM attribute WHERE {column} = ?"))
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .collect();

    let mut keep = HashSet::new();
    for input in inputs {
        if let Some(id) = input.id {
            if !existing.contains(&id) {
                return Err(RepoError::NotFound(format!(
                    "Attribute {id} not found in {}",
                    scope_label(scope)
                )));
            }
            keep.insert(id);
        }
    }

    for id in existing.difference(&keep) {
        sqlx::query("DELETE FROM attribute WHERE id = ?")
            .bind(*id)
            .execute(&mut *conn)
            .await?;
    }

    for input in inputs {
        match input.id {
            Some(id) => {
                let name = input.name.trim();
                if name.is_empty() {
                    return Err(RepoError::Validation("Attribute name is required".into()));
                }
                sqlx::query("UPDATE attribute SET name = ?, is_displayable = ? WHERE id = ?")
                    .bind(name)
                    .bind(input.is_displayable)
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
            }
            None => {
                insert(conn, scope, &input.name, input.is_displayable).await?;
            }
        }
    }

    Ok(())
}
