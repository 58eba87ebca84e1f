//! Subcategory API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subcategories", get(handler::list).post(handler::create))
        .route("/subcategories/{id}", put(handler::update).delete(handler::delete))
        .route("/subcategories/{id}/attributes", get(handler::list_attributes))
        .route("/subcategories/attributes", post(handler::create_attribute))
}
