//! Orders: frozen snapshots assembled from basket lines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::{
    AddressId, BasketLineId, Locale, OrderId, OrderItemId, OrderStatus, TelegramId, UserId,
    VariantId,
};

/// A placed order. Immutable after assembly except for `status`.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Delivery address snapshot, frozen at creation.
    pub address: String,
    pub status: OrderStatus,
    /// Total frozen at creation; never recomputed from the live catalog.
    pub total_price: Decimal,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One order line. Created atomically with its order, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Nullable so the snapshot survives variant deletion.
    pub product_variant_id: Option<VariantId>,
    pub quantity: i32,
}

/// One requested order line: either a basket line to consume or an explicit
/// (variant, quantity) pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LineSelector {
    /// Consume an existing basket line (deleting it on success).
    Basket { basket_id: BasketLineId },
    /// An explicit pair, bypassing the basket.
    Explicit {
        product_variant_id: VariantId,
        quantity: i32,
    },
}

/// Request to assemble an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub telegram_id: TelegramId,
    /// Ordered, non-empty list of lines to include.
    pub items: Vec<LineSelector>,
    /// Reference to a saved address; must belong to the caller.
    pub address_id: Option<AddressId>,
    /// Free-text address, used when no `address_id` is given.
    pub address: Option<String>,
    pub comment: Option<String>,
    /// Client-computed cart total. Display hint only: the persisted total is
    /// always recomputed server-side from variant prices.
    pub total_price: Option<Decimal>,
}

/// Response to a successful order creation.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    pub total_price: Decimal,
}

/// Request to move an order to a new status.
///
/// The status arrives as a raw string so unknown values surface as the
/// domain's `InvalidStatus` error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: String,
}

/// Order with resolved item snapshots, as returned to the bot.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub status: OrderStatus,
    pub address: String,
    pub total_price: Decimal,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

/// Item line inside [`OrderView`]. Catalog fields are the variant's current
/// values and go `None` when the variant has been deleted.
#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub product_variant_id: Option<VariantId>,
    pub quantity: i32,
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// One entry of the localized status directory shown to shop owners.
#[derive(Debug, Serialize)]
pub struct StatusDirectoryEntry {
    pub key: String,
    pub uz: &'static str,
    pub ru: &'static str,
}

/// The full localized status directory.
#[must_use]
pub fn status_directory() -> Vec<StatusDirectoryEntry> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusDirectoryEntry {
            key: status.to_string(),
            uz: status.label(Locale::Uz),
            ru: status.label(Locale::Ru),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parses_basket_reference() {
        let selector: LineSelector =
            serde_json::from_str(r#"{"basket_id":5}"#).expect("deserialize");
        assert!(matches!(
            selector,
            LineSelector::Basket { basket_id } if basket_id == BasketLineId::new(5)
        ));
    }

    #[test]
    fn test_selector_parses_explicit_pair() {
        let selector: LineSelector =
            serde_json::from_str(r#"{"product_variant_id":3,"quantity":2}"#).expect("deserialize");
        assert!(matches!(
            selector,
            LineSelector::Explicit { product_variant_id, quantity }
                if product_variant_id == VariantId::new(3) && quantity == 2
        ));
    }

    #[test]
    fn test_status_directory_covers_all_statuses() {
        let directory = status_directory();
        assert_eq!(directory.len(), OrderStatus::ALL.len());
        assert!(directory.iter().any(|e| e.key == "new" && e.uz == "Yangi"));
        assert!(
            directory
                .iter()
                .any(|e| e.key == "delivered" && e.ru == "Доставлен")
        );
    }
}
