//! Category API Handlers

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Attribute, AttributeScope, Category, CategoryAttributeCreate, CategoryCreate,
    CategoryUpdate,
};

use crate::api::{AppJson, AppPath, MutationResponse};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::db::repository::{attribute, category};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_attribute_inputs, validate_optional_text,
    validate_required_text,
};

const RESOURCE: &str = "category";

/// GET /categories - all categories, image host rewritten
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.pool()).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(|c| state.rewrite.category(c))
            .collect(),
    ))
}

/// POST /categories - create a category with its attributes
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CategoryCreate>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_attribute_inputs(&payload.attributes)?;

    let created = category::create(state.pool(), payload).await?;
    audit_log!(current_user.username, "create", format!("{RESOURCE}:{}", created.id));

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Category created successfully", created.id)),
    ))
}

/// PUT /categories/{id} - replace name and image, synchronize attributes
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CategoryUpdate>,
) -> AppResult<Json<MutationResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_attribute_inputs(&payload.attributes)?;

    category::update(state.pool(), id, payload).await?;
    audit_log!(current_user.username, "update", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Category updated successfully")))
}

/// DELETE /categories/{id} - cascades to subcategories, products and attributes
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MutationResponse>> {
    category::delete(state.pool(), id).await?;
    audit_log!(current_user.username, "delete", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Category deleted successfully")))
}

/// GET /categories/{id}/attributes - attributes defined on the category itself
pub async fn list_attributes(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Vec<Attribute>>> {
    category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id))?;
    Ok(Json(attribute::find_by_category(state.pool(), id).await?))
}

/// POST /categories/attributes - add one attribute to a category
pub async fn create_attribute(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CategoryAttributeCreate>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let created = attribute::create(
        state.pool(),
        AttributeScope::Category(payload.category_id),
        &payload.name,
        payload.is_displayable,
    )
    .await?;
    audit_log!(current_user.username, "create", format!("attribute:{}", created.id));

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Attribute created successfully", created.id)),
    ))
}
