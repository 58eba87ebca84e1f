//! Attribute Model
//!
//! Attributes are schema definitions scoped to exactly one category or one
//! subcategory. Product values live in `Product::extra_attributes`, keyed by
//! attribute name.

use super::serde_helpers::bool_false;
use serde::{Deserialize, Serialize};

/// Attribute entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attribute {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    /// Whether product values for this attribute are shown to end users
    pub is_displayable: bool,
}

/// Scope an attribute definition belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope {
    Category(i64),
    Subcategory(i64),
}

impl Attribute {
    pub fn scope(&self) -> Option<AttributeScope> {
        match (self.category_id, self.subcategory_id) {
            (Some(id), None) => Some(AttributeScope::Category(id)),
            (None, Some(id)) => Some(AttributeScope::Subcategory(id)),
            _ => None,
        }
    }
}

/// Attribute entry nested in category/subcategory payloads
///
/// With `id` it updates an existing attribute of the parent, without it a new
/// one is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInput {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "bool_false")]
    pub is_displayable: bool,
}

/// Standalone category attribute creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAttributeCreate {
    pub name: String,
    pub category_id: i64,
    #[serde(default, deserialize_with = "bool_false")]
    pub is_displayable: bool,
}

/// Standalone subcategory attribute creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryAttributeCreate {
    pub name: String,
    pub subcategory_id: i64,
    #[serde(default, deserialize_with = "bool_false")]
    pub is_displayable: bool,
}

/// Attribute visible in a scope, with the distinct values used by products in that scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedAttribute {
    pub id: i64,
    pub name: String,
    pub options: Vec<serde_json::Value>,
}
