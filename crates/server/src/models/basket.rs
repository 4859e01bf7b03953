//! Basket lines: the mutable per-user, per-shop ledger.

use serde::{Deserialize, Serialize};

use bazaar_core::{BasketLineId, ShopId, TelegramId, UserId, VariantId};

use super::catalog::ProductVariant;

/// One (user, variant, quantity) record prior to order placement.
#[derive(Debug, Clone, Serialize)]
pub struct BasketLine {
    pub id: BasketLineId,
    pub user_id: UserId,
    pub shop_id: ShopId,
    pub product_variant_id: VariantId,
    pub quantity: i32,
}

/// Request to set a basket line's quantity.
///
/// Quantity semantics: 0 removes the line, any positive value replaces the
/// stored quantity (never adds to it).
#[derive(Debug, Deserialize)]
pub struct UpsertBasketInput {
    pub telegram_id: TelegramId,
    pub product_variant_id: VariantId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Step direction for the ±1 basket endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasketStep {
    Add,
    Remove,
}

/// Request to bump a basket line up or down by one.
#[derive(Debug, Deserialize)]
pub struct StepBasketInput {
    pub telegram_id: TelegramId,
    pub product_variant_id: VariantId,
    pub action: BasketStep,
}

/// Result of a basket mutation, echoing the resulting quantity.
#[derive(Debug, Serialize)]
pub struct BasketMutation {
    /// Quantity now stored for the line; 0 means the line is gone.
    pub quantity: i32,
    pub message: &'static str,
}

/// A basket line resolved to its live variant snapshot.
///
/// Nothing here is frozen: price, discount, and stock are the variant's
/// current values, so basket totals always reflect the catalog of the
/// moment.
#[derive(Debug, Serialize)]
pub struct BasketLineView {
    pub id: BasketLineId,
    pub quantity: i32,
    pub product_name: String,
    pub variant: ProductVariant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_input_defaults_quantity_to_one() {
        let input: UpsertBasketInput =
            serde_json::from_str(r#"{"telegram_id":"42","product_variant_id":7}"#)
                .expect("deserialize");
        assert_eq!(input.quantity, 1);
    }

    #[test]
    fn test_step_action_parses_lowercase() {
        let input: StepBasketInput = serde_json::from_str(
            r#"{"telegram_id":"42","product_variant_id":7,"action":"remove"}"#,
        )
        .expect("deserialize");
        assert_eq!(input.action, BasketStep::Remove);
    }
}
