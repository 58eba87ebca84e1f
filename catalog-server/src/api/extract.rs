//! Request extractors and response bodies shared by handlers
//!
//! Body and query rejections are turned into [`AppError`] so malformed input
//! gets the same JSON error shape as every other failure.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Serialize;
use shared::error::AppError;

/// JSON body extractor with structured rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor with structured rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameter extractor with structured rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Body of create/update/delete responses
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MutationResponse {
    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }
}
