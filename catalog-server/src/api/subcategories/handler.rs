//! Subcategory API Handlers

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Attribute, AttributeScope, Subcategory, SubcategoryAttributeCreate, SubcategoryCreate,
    SubcategoryUpdate,
};

use crate::api::{AppJson, AppPath, MutationResponse};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::db::repository::{attribute, subcategory};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_attribute_inputs, validate_optional_text,
    validate_required_text,
};

const RESOURCE: &str = "subcategory";

/// GET /subcategories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Subcategory>>> {
    let subcategories = subcategory::find_all(state.pool()).await?;
    Ok(Json(
        subcategories
            .into_iter()
            .map(|s| state.rewrite.subcategory(s))
            .collect(),
    ))
}

/// POST /subcategories
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<SubcategoryCreate>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_attribute_inputs(&payload.attributes)?;

    let created = subcategory::create(state.pool(), payload).await?;
    audit_log!(current_user.username, "create", format!("{RESOURCE}:{}", created.id));

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Subcategory created successfully", created.id)),
    ))
}

/// PUT /subcategories/{id} - image kept when absent or empty
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<SubcategoryUpdate>,
) -> AppResult<Json<MutationResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_attribute_inputs(&payload.attributes)?;

    subcategory::update(state.pool(), id, payload).await?;
    audit_log!(current_user.username, "update", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Subcategory updated successfully")))
}

/// DELETE /subcategories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MutationResponse>> {
    subcategory::delete(state.pool(), id).await?;
    audit_log!(current_user.username, "delete", format!("{RESOURCE}:{id}"));

    Ok(Json(MutationResponse::ok("Subcategory deleted successfully")))
}

/// GET /subcategories/{id}/attributes
pub async fn list_attributes(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Vec<Attribute>>> {
    subcategory::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SubcategoryNotFound).with_detail("id", id))?;
    Ok(Json(attribute::find_by_subcategory(state.pool(), id).await?))
}

/// POST /subcategories/attributes
pub async fn create_attribute(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<SubcategoryAttributeCreate>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let created = attribute::create(
        state.pool(),
        AttributeScope::Subcategory(payload.subcategory_id),
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
