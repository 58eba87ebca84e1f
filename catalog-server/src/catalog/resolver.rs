//! Attribute Resolver
//!
//! Attributes visible in a scope, each with the distinct values products in
//! that scope actually use for it.

use crate::db::repository::{attribute, category, product, subcategory};
use serde_json::{Map, Value};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ResolvedAttribute;
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Resolved scope: a category, optionally narrowed to one of its subcategories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub subcategory_id: Option<i64>,
    pub category_id: i64,
}

/// Resolve the scope ids, deriving the category from the subcategory
///
/// A supplied subcategory takes precedence: its owning category replaces any
/// `category_id` given alongside it.
pub async fn resolve_scope(
    pool: &SqlitePool,
    subcategory_id: Option<i64>,
    category_id: Option<i64>,
) -> AppResult<Scope> {
    let (subcategory_id, category_id) = match (subcategory_id, category_id) {
        (Some(sub_id), _) => {
            let sub = subcategory::find_by_id(pool, sub_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::SubcategoryNotFound))?;
            (Some(sub.id), sub.category_id)
        }
        (None, Some(cat_id)) => (None, cat_id),
        (None, None) => return Err(AppError::new(ErrorCode::ScopeRequired)),
    };

    if category::find_by_id(pool, category_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }

    Ok(Scope {
        subcategory_id,
        category_id,
    })
}

/// Distinct values stored under `name`, in first-seen order
///
/// Products without the key contribute nothing; stored nulls are skipped.
pub fn collect_options<'a, I>(maps: I, name: &str) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for value in maps.into_iter().filter_map(|m| m.get(name)) {
        if value.is_null() {
            continue;
        }
        if seen.insert(value.to_string()) {
            options.push(value.clone());
        }
    }
    options
}

/// Subcategory attributes first, then the category's, each with its options
pub async fn resolve(
    pool: &SqlitePool,
    subcategory_id: Option<i64>,
    category_id: Option<i64>,
) -> AppResult<Vec<ResolvedAttribute>> {
    let scope = resolve_scope(pool, subcategory_id, category_id).await?;

    let attributes =
        attribute::find_for_scope(pool, scope.subcategory_id, scope.category_id).await?;
    let products =
        product::find_in_scope(pool, scope.subcategory_id, Some(scope.category_id)).await?;

    Ok(attributes
        .into_iter()
        .map(|attr| ResolvedAttribute {
            options: collect_options(products.iter().map(|p| &p.extra_attributes), &attr.name),
            id: attr.id,
            name: attr.name,
        })
        .collect())
}
