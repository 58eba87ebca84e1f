//! Subcategory Model

use super::attribute::AttributeInput;
use serde::{Deserialize, Serialize};

/// Subcategory entity, owned by exactly one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub image: Option<String>,
}

/// Create subcategory payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryCreate {
    pub name: String,
    pub category_id: i64,
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
}

/// Update subcategory payload
///
/// `image` keeps the stored value when absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryUpdate {
    pub name: String,
    pub category_id: i64,
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
}
