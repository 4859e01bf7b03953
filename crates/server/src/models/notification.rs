//! Structured notification payloads.
//!
//! Core operations never touch the network: they return these payloads to
//! the caller, which dispatches them through the Telegram gateway after the
//! surrounding transaction has committed (outbox pattern). Rendering into
//! message text happens in `crate::telegram::messages`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{Locale, OrderId, OrderStatus};

/// A notification ready for dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Shop-facing: a new order landed in the shop's order group.
    NewOrder(OrderNotification),
    /// User-facing: the order was accepted for processing.
    OrderConfirmed(OrderNotification),
    /// User-facing: the order moved to a new status.
    StatusChanged(StatusNotification),
}

impl NotificationPayload {
    /// Chat the payload is addressed to.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        match self {
            Self::NewOrder(n) | Self::OrderConfirmed(n) => &n.chat_id,
            Self::StatusChanged(n) => &n.chat_id,
        }
    }

    /// Order the payload concerns.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        match self {
            Self::NewOrder(n) | Self::OrderConfirmed(n) => n.order_id,
            Self::StatusChanged(n) => n.order_id,
        }
    }
}

/// Everything the order templates need, captured at assembly time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotification {
    /// Destination chat (shop group or the customer's own chat).
    pub chat_id: String,
    pub locale: Locale,
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_username: Option<String>,
    pub address: String,
    pub comment: Option<String>,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<NotificationItem>,
}

/// One order line as rendered in a notification.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationItem {
    pub product_name: String,
    pub quantity: i32,
    /// Unit price × quantity at assembly time.
    pub line_total: Decimal,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Payload for a status-changed notification.
#[derive(Debug, Clone, Serialize)]
pub struct StatusNotification {
    pub chat_id: String,
    pub locale: Locale,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub address: String,
}
