//! catalog-server - e-commerce catalog backend
//!
//! # Modules
//!
//! - [`api`] - HTTP routes and handlers
//! - [`auth`] - admin login and the write-endpoint gate
//! - [`catalog`] - attribute resolver and product query engine
//! - [`config`] - environment configuration
//! - [`db`] - SQLite pool, migrations and repositories
//! - [`notify`] - order notification sink
//! - [`storage`] - uploaded image storage
//! - [`utils`] - logging, SQL building and input validation

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod state;
pub mod storage;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use state::AppState;
pub use utils::{AppError, AppResult, ErrorCode};
