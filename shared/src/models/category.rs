//! Category Model

use super::attribute::AttributeInput;
use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Display image URL
    pub image: Option<String>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub image: Option<String>,
    /// Category-scoped attribute definitions created alongside the category
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
}

/// Update category payload (full replace of name and image)
///
/// `attributes` is synchronized against the stored set: listed ids are
/// updated, id-less entries inserted, everything else deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: String,
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
}
