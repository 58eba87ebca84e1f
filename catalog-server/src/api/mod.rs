//! HTTP API
//!
//! # Modules
//!
//! - [`health`] - health check
//! - [`auth`] - admin login
//! - [`categories`] / [`subcategories`] - taxonomy CRUD with nested attributes
//! - [`attributes`] - attribute resolver
//! - [`products`] - product query engine and CRUD
//! - [`upload`] - image upload and serving
//! - [`orders`] - order intake

pub mod extract;

pub mod attributes;
pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod subcategories;
pub mod upload;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::state::AppState;

pub use extract::{AppJson, AppPath, AppQuery, MutationResponse};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(subcategories::router())
        .merge(attributes::router())
        .merge(products::router())
        .merge(upload::router())
        .merge(orders::router())
}

/// Build the application with all middleware attached
///
/// Used by the HTTP server and by integration tests through `oneshot`.
pub fn build_app(state: &AppState) -> Router<AppState> {
    build_router()
        // Auth gate - reads and public writes pass, injects CurrentUser
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
