//! Attribute resolver handler

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::ResolvedAttribute;

use crate::api::AppQuery;
use crate::catalog::query::parse_id;
use crate::catalog::resolver;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScopeParams {
    pub subcategory_id: Option<String>,
    pub category_id: Option<String>,
}

/// GET /attributes
pub async fn resolve(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ScopeParams>,
) -> AppResult<Json<Vec<ResolvedAttribute>>> {
    let subcategory_id = parse_id(&params.subcategory_id, "subcategory_id")?;
    let category_id = parse_id(&params.category_id, "category_id")?;
    let attributes = resolver::resolve(state.pool(), subcategory_id, category_id).await?;
    Ok(Json(attributes))
}
