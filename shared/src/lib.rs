//! Shared types for the catalog service
//!
//! Error types, response structures and catalog data models used by the
//! server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
