//! Authentication middleware
//!
//! Reads are public; every other method needs `Authorization: Bearer <token>`
//! except the public write endpoints (`POST /login`, `POST /orders`).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::error::AppError;

use super::{CurrentUser, JwtError, JwtService};
use crate::state::AppState;

const PUBLIC_WRITE_PATHS: &[&str] = &["/login", "/orders"];

fn is_public(method: &Method, path: &str) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
        || PUBLIC_WRITE_PATHS.contains(&path)
}

/// Validate the bearer token and insert [`CurrentUser`] into request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), method = %req.method(), "auth_missing");
            return Err(AppError::not_authenticated());
        }
    };

    match state.jwt.validate_token(token).and_then(CurrentUser::try_from) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "auth_failed");
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
