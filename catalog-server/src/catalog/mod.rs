//! Catalog core: attribute resolution and product querying
//!
//! - [`resolver`]: attributes visible in a scope plus the values in use
//! - [`filter`] / [`query`]: listing filters compiled to SQL conditions
//! - [`projection`]: displayability enrichment and image host rewrite
//! - [`validation`]: product write checks

pub mod filter;
pub mod projection;
pub mod query;
pub mod resolver;
pub mod validation;

use crate::config::UnknownAttributePolicy;
use crate::db::repository::{attribute, product, subcategory};
use projection::ImageHostRewrite;
use query::ProductQuery;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductDraft, ProductInput, ProductView};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Run a listing query and project the results
pub async fn list_products(
    pool: &SqlitePool,
    query: &ProductQuery,
    rewrite: &ImageHostRewrite,
) -> AppResult<Vec<ProductView>> {
    let products = product::search(pool, &query.to_builder()).await?;
    projection::project_all(pool, products, rewrite).await
}

pub async fn get_product(
    pool: &SqlitePool,
    id: i64,
    rewrite: &ImageHostRewrite,
) -> AppResult<ProductView> {
    let product = product::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    let mut views = projection::project_all(pool, vec![product], rewrite).await?;
    views
        .pop()
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

/// Validate a product write against the store
///
/// Checks the payload, the target subcategory and the extra-attribute keys
/// against the attributes of that subcategory and its category.
pub async fn prepare_product(
    pool: &SqlitePool,
    input: ProductInput,
    existing: Option<&Product>,
    policy: UnknownAttributePolicy,
) -> AppResult<ProductDraft> {
    let draft = validation::build_draft(input, existing)?;

    let sub = subcategory::find_by_id(pool, draft.subcategory_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::SubcategoryNotFound).with_detail("id", draft.subcategory_id)
        })?;

    if !draft.extra_attributes.is_empty() {
        let known: HashSet<String> =
            attribute::find_for_scope(pool, Some(sub.id), sub.category_id)
                .await?
                .into_iter()
                .map(|a| a.name)
                .collect();
        validation::check_attribute_keys(draft.extra_attributes.keys(), &known, policy)?;
    }

    Ok(draft)
}
