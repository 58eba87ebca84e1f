//! Utility modules

pub mod logger;
pub mod query_builder;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
