//! Order Model
//!
//! Orders are not persisted; an accepted order is forwarded to the
//! notification sink.

use super::serde_helpers::flexible_f64_opt;
use serde::{Deserialize, Serialize};

/// Order placed by a buyer from the storefront
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Product reference as sent by the storefront (id or name)
    pub product_id: Option<serde_json::Value>,
    pub buyer_name: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_address: Option<String>,
    pub buyer_city: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub price: Option<f64>,
}

/// Order after validation, as handed to the notifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub product: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub buyer_city: String,
    pub price: f64,
}
