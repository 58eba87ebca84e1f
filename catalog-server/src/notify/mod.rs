//! Order notification sink
//!
//! Accepted orders are handed to an [`OrderNotifier`]. Delivery runs in the
//! background and failures are only logged.

pub mod telegram;

use async_trait::async_trait;
use shared::models::PlacedOrder;
use std::sync::Arc;
use thiserror::Error;

pub use telegram::TelegramNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn notify(&self, order: &PlacedOrder) -> Result<(), NotifyError>;
}

/// Human-readable order summary sent to the shop owner
pub fn format_order_message(order: &PlacedOrder) -> String {
    format!(
        "🛒 Nouvelle commande reçue:\n\
         📦 Produit: {}\n\
         👤 Nom: {}\n\
         📞 Téléphone: {}\n\
         🏠 Adresse: {}\n\
         🏙️ Ville: {}\n\
         💰 Prix: {} MAD",
        order.product,
        order.buyer_name,
        order.buyer_phone,
        order.buyer_address,
        order.buyer_city,
        order.price,
    )
}

/// Deliver in the background; the caller never waits on the sink
pub fn dispatch(notifier: Arc<dyn OrderNotifier>, order: PlacedOrder) {
    tokio::spawn(async move {
        match notifier.notify(&order).await {
            Ok(()) => tracing::info!(product = %order.product, "Order notification sent"),
            Err(e) => tracing::error!(error = %e, product = %order.product, "Order notification failed"),
        }
    });
}
