//! Product API
//!
//! Listing goes through the query engine (`crate::catalog::query`); every
//! product served is projected with attribute displayability.

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(handler::list).post(handler::create))
        .route(
            "/products/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
