//! Product Model

use super::serde_helpers::{flexible_bool_opt, flexible_f64_opt, flexible_i64_opt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Product condition, stored and served by its French display label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum ProductCondition {
    #[default]
    #[serde(rename = "Neuf")]
    #[cfg_attr(feature = "db", sqlx(rename = "Neuf"))]
    New,
    #[serde(rename = "D'occasion - Comme neuf")]
    #[cfg_attr(feature = "db", sqlx(rename = "D'occasion - Comme neuf"))]
    UsedLikeNew,
    #[serde(rename = "D'occasion - Etat parfait")]
    #[cfg_attr(feature = "db", sqlx(rename = "D'occasion - Etat parfait"))]
    UsedExcellent,
    #[serde(rename = "D'occasion - Très bon état")]
    #[cfg_attr(feature = "db", sqlx(rename = "D'occasion - Très bon état"))]
    UsedVeryGood,
    #[serde(rename = "D'occasion - Bon état")]
    #[cfg_attr(feature = "db", sqlx(rename = "D'occasion - Bon état"))]
    UsedGood,
    #[serde(rename = "D'occasion - Etat correct")]
    #[cfg_attr(feature = "db", sqlx(rename = "D'occasion - Etat correct"))]
    UsedFair,
}

impl ProductCondition {
    pub const ALL: [ProductCondition; 6] = [
        Self::New,
        Self::UsedLikeNew,
        Self::UsedExcellent,
        Self::UsedVeryGood,
        Self::UsedGood,
        Self::UsedFair,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "Neuf",
            Self::UsedLikeNew => "D'occasion - Comme neuf",
            Self::UsedExcellent => "D'occasion - Etat parfait",
            Self::UsedVeryGood => "D'occasion - Très bon état",
            Self::UsedGood => "D'occasion - Bon état",
            Self::UsedFair => "D'occasion - Etat correct",
        }
    }

    const fn key(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::UsedLikeNew => "used_like_new",
            Self::UsedExcellent => "used_excellent",
            Self::UsedVeryGood => "used_very_good",
            Self::UsedGood => "used_good",
            Self::UsedFair => "used_fair",
        }
    }

    pub const fn is_used(&self) -> bool {
        !matches!(self, Self::New)
    }

    /// Mapping for the boolean `is_used` flag of older clients
    pub const fn from_legacy_used(is_used: bool) -> Self {
        if is_used { Self::UsedFair } else { Self::New }
    }
}

impl fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown condition: {}", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for ProductCondition {
    type Err = UnknownCondition;

    /// Accepts the display label (case-insensitive) or the snake_case key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted || c.key() == wanted)
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub main_photo: Option<String>,
    /// Additional photo URLs, in display order
    #[cfg_attr(feature = "db", sqlx(json))]
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub price: f64,
    /// Price before discount
    pub original_price: Option<f64>,
    pub is_promotion: bool,
    pub is_top_product: bool,
    pub condition: ProductCondition,
    pub stock: i64,
    pub subcategory_id: i64,
    /// Free-form attribute name -> value map
    #[cfg_attr(feature = "db", sqlx(json))]
    pub extra_attributes: Map<String, Value>,
}

/// Product create / update payload
///
/// Every field is optional at the serde level so validation can name the
/// missing one. Numbers and flags also accept their string forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub main_photo: Option<String>,
    pub photos: Option<Vec<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub original_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_bool_opt")]
    pub is_promotion: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool_opt")]
    pub is_top_product: Option<bool>,
    pub condition: Option<String>,
    /// Older clients send a used flag instead of a condition
    #[serde(default, deserialize_with = "flexible_bool_opt")]
    pub is_used: Option<bool>,
    #[serde(default, deserialize_with = "flexible_i64_opt")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "flexible_i64_opt")]
    pub subcategory_id: Option<i64>,
    pub extra_attributes: Option<Map<String, Value>>,
}

/// Validated product fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub main_photo: Option<String>,
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub is_promotion: bool,
    pub is_top_product: bool,
    pub condition: ProductCondition,
    pub stock: i64,
    pub subcategory_id: i64,
    pub extra_attributes: Map<String, Value>,
}

/// Extra attribute value annotated with its displayability
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeValue {
    pub value: Value,
    pub is_displayable: bool,
}

/// Product as served by listing and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub main_photo: Option<String>,
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub is_promotion: bool,
    pub is_top_product: bool,
    pub condition: ProductCondition,
    pub is_used: bool,
    pub stock: i64,
    pub subcategory_id: i64,
    pub extra_attributes: BTreeMap<String, AttributeValue>,
}
