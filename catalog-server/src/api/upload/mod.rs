//! Upload Routes
//!
//! `POST /upload` stores an image (authenticated); `GET /uploads/{filename}`
//! serves stored files publicly.

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;
use crate::storage::MAX_FILE_SIZE;

/// Multipart framing overhead allowed on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(handler::upload).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route("/uploads/{filename}", get(handler::serve))
}
