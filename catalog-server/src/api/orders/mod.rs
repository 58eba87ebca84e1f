//! Order intake
//!
//! Orders are validated and handed to the notification sink; nothing is
//! persisted.

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/orders", post(handler::place))
}
