//! Login handler

use axum::{Json, extract::State};
use shared::error::AppResult;
use shared::models::{LoginRequest, LoginResponse};

use crate::api::AppJson;
use crate::auth;
use crate::state::AppState;

/// POST /login - exchange admin credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let access_token = auth::login(state.pool(), &state.jwt, &req.username, &req.password).await?;
    tracing::info!(target: "security", username = %req.username, "login_success");
    Ok(Json(LoginResponse { access_token }))
}
