//! Order handler

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderRequest, PlacedOrder};

use crate::api::{AppJson, MutationResponse};
use crate::notify;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};

fn missing(field: &str) -> AppError {
    AppError::with_message(ErrorCode::OrderInvalid, format!("{field} is required"))
        .with_detail("field", field)
}

fn required_text(value: Option<String>, field: &str, max_len: usize) -> AppResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))?;
    validate_required_text(&value, field, max_len)?;
    Ok(value)
}

/// Product reference as text; the storefront sends either an id or a name
fn product_reference(value: Option<Value>) -> AppResult<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(missing("productId")),
    }
}

pub(crate) fn validate_order(req: OrderRequest) -> AppResult<PlacedOrder> {
    let price = req.price.ok_or_else(|| missing("price"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(
            AppError::with_message(ErrorCode::OrderInvalid, "price must be a non-negative number")
                .with_detail("field", "price"),
        );
    }
    Ok(PlacedOrder {
        product: product_reference(req.product_id)?,
        buyer_name: required_text(req.buyer_name, "buyerName", MAX_NAME_LEN)?,
        buyer_phone: required_text(req.buyer_phone, "buyerPhone", MAX_SHORT_TEXT_LEN)?,
        buyer_address: required_text(req.buyer_address, "buyerAddress", MAX_ADDRESS_LEN)?,
        buyer_city: required_text(req.buyer_city, "buyerCity", MAX_SHORT_TEXT_LEN)?,
        price,
    })
}

/// POST /orders
pub async fn place(
    State(state): State<AppState>,
    AppJson(req): AppJson<OrderRequest>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    let order = validate_order(req)?;
    tracing::info!(product = %order.product, city = %order.buyer_city, "Order received");

    match &state.notifier {
        Some(notifier) => notify::dispatch(notifier.clone(), order),
        None => tracing::warn!(product = %order.product, "No order notifier configured, order dropped"),
    }

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::ok("Order saved successfully")),
    ))
}
