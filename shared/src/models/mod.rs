//! Data models
//!
//! Shared between catalog-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod attribute;
pub mod category;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod subcategory;
pub mod user;

// Re-exports
pub use attribute::*;
pub use category::*;
pub use order::*;
pub use product::*;
pub use subcategory::*;
pub use user::*;
