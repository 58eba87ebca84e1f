//! Product API Handlers

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{ProductInput, ProductView};

use crate::api::{AppJson, AppPath, AppQuery, MutationResponse};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::catalog::{self, query::{ListingParams, ProductQuery}};
use crate::db::repository::product;
use crate::state::AppState;

const RESOURCE: &str = "product";

/// GET /products - filtered listing
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListingParams>,
) -> AppResult<Json<Vec<ProductView>>> {
    let query = ProductQuery::parse(&params, state.config.filter_mode)?;
    tracing::debug!(?query, "Product listing");
    let products = catalog::list_products(state.pool(), &query, &state.rewrite).await?;
    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<ProductView>> {
    let product = catalog::get_product(state.pool(), id, &state.rewrite).await?;
    Ok(Json(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<ProductInput>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    let draft = catalog::prepare_product(
        state.pool(),
        payload,
        None,
        state.config.unknown_attribute_policy,
    )
    .await?;

    let created = product::create(state.pool(), draft).await?;
    audit_log!(current_user.username, "create", format!("{RESOURCE}:{}", created.id));

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Product created successfully", created.id)),
    ))
}

/// PUT /products/{id} - full replace; photos and extra attributes may be retained
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ProductInput>,
) -> AppResult<Json<MutationResponse>> {
    let existing = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("id", id))?;

    let draft = catalog::prepare_product(
        state.pool(),
        payload,
        Some(&existing),
        state.config.unknown_attribute_policy,
    )
    .await?;

    product::update(state.pool(), id, draft).await?;
    audit_log!(current_user.username, "update", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Product updated successfully")))
}

/// DELETE /products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MutationResponse>> {
    product::delete(state.pool(), id).await?;
    audit_log!(current_user.username, "delete", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Product deleted successfully")))
}
