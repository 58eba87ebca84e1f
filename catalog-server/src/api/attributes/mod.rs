//! Attribute resolver API
//!
//! `GET /attributes?subcategory_id=&category_id=` lists the attributes
//! visible in a scope (subcategory-scoped first) with the distinct values
//! products in that scope currently use.

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/attributes", get(handler::resolve))
}
