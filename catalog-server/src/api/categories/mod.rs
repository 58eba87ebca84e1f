//! Category API
//!
//! Category-scoped attribute definitions are managed through the category
//! payload or through `POST /categories/attributes`.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handler::list).post(handler::create))
        .route("/categories/{id}", put(handler::update).delete(handler::delete))
        .route("/categories/{id}/attributes", get(handler::list_attributes))
        .route("/categories/attributes", post(handler::create_attribute))
}
