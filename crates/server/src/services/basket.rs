//! Basket ledger service.
//!
//! Validations live here; the ledger rows live in `db::basket`. No price is
//! ever frozen on this path — that is order assembly's job — so basket
//! listings always reflect the live catalog.

use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::{BasketLineId, TelegramId};

use crate::db::basket::BasketRepository;
use crate::db::catalog::{VariantWithShop, variant_with_shop};
use crate::db::shops::ShopRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::models::basket::{
    BasketLineView, BasketMutation, BasketStep, StepBasketInput, UpsertBasketInput,
};
use crate::models::user::BotUser;

/// Service for basket ledger operations.
pub struct BasketService<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketService<'a> {
    /// Create a new basket service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Set a line's quantity (replace semantics).
    ///
    /// Quantity 0 removes the line and is a no-op when it is already gone.
    /// Any positive quantity overwrites the stored one — it never adds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidQuantity` for negative quantities,
    /// `AppError::UserNotFound` / `AppError::VariantNotFound` for unknown
    /// references, and `AppError::InactiveShop` when the variant's shop is
    /// closed.
    #[instrument(skip(self, input), fields(telegram_id = %input.telegram_id, variant_id = %input.product_variant_id))]
    pub async fn upsert_line(&self, input: &UpsertBasketInput) -> Result<BasketMutation> {
        if input.quantity < 0 {
            return Err(AppError::InvalidQuantity);
        }

        let user = self.resolve_user(&input.telegram_id).await?;
        let resolved = self.resolve_open_variant(input.product_variant_id).await?;

        let baskets = BasketRepository::new(self.pool);

        if input.quantity == 0 {
            baskets
                .delete_by_variant(user.id, input.product_variant_id)
                .await?;
            return Ok(BasketMutation {
                quantity: 0,
                message: "Basket line removed",
            });
        }

        let existed = baskets
            .find_by_variant(user.id, input.product_variant_id)
            .await?
            .is_some();

        let line = baskets
            .upsert_line(
                user.id,
                resolved.shop_id,
                input.product_variant_id,
                input.quantity,
            )
            .await?;

        Ok(BasketMutation {
            quantity: line.quantity,
            message: if existed {
                "Basket updated"
            } else {
                "Basket created"
            },
        })
    }

    /// Bump a line by one in either direction.
    ///
    /// Adding to a missing line creates it at quantity 1; removing past
    /// zero deletes the line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::LineNotFound` when removing from a line that
    /// doesn't exist, plus the same reference/shop errors as
    /// [`upsert_line`](Self::upsert_line).
    #[instrument(skip(self, input), fields(telegram_id = %input.telegram_id, variant_id = %input.product_variant_id))]
    pub async fn step_line(&self, input: &StepBasketInput) -> Result<BasketMutation> {
        let user = self.resolve_user(&input.telegram_id).await?;
        let resolved = self.resolve_open_variant(input.product_variant_id).await?;

        let baskets = BasketRepository::new(self.pool);
        let existing = baskets
            .find_by_variant(user.id, input.product_variant_id)
            .await?;

        match (existing, input.action) {
            (None, BasketStep::Add) => {
                let line = baskets
                    .upsert_line(user.id, resolved.shop_id, input.product_variant_id, 1)
                    .await?;
                Ok(BasketMutation {
                    quantity: line.quantity,
                    message: "Item added to basket",
                })
            }
            (None, BasketStep::Remove) => Err(AppError::LineNotFound),
            (Some(line), BasketStep::Add) => {
                let updated = baskets.set_quantity(line.id, line.quantity + 1).await?;
                Ok(BasketMutation {
                    quantity: updated.quantity,
                    message: "Item quantity increased",
                })
            }
            (Some(line), BasketStep::Remove) => {
                if line.quantity <= 1 {
                    baskets.delete(line.id).await?;
                    Ok(BasketMutation {
                        quantity: 0,
                        message: "Item removed from basket",
                    })
                } else {
                    let updated = baskets.set_quantity(line.id, line.quantity - 1).await?;
                    Ok(BasketMutation {
                        quantity: updated.quantity,
                        message: "Item quantity decreased",
                    })
                }
            }
        }
    }

    /// List a user's lines in one shop, resolved to live variant snapshots.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` / `AppError::UserNotFound` for
    /// unknown references.
    pub async fn list_lines(
        &self,
        shop_code: &str,
        telegram_id: &TelegramId,
    ) -> Result<Vec<BasketLineView>> {
        let shop = ShopRepository::new(self.pool)
            .find_by_code(shop_code)
            .await?
            .ok_or(AppError::ShopNotFound)?;
        let user = self.resolve_user(telegram_id).await?;

        Ok(BasketRepository::new(self.pool)
            .list_for_shop(user.id, shop.id)
            .await?)
    }

    /// Delete a line by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::LineNotFound` if it doesn't exist.
    pub async fn delete_line(&self, id: BasketLineId) -> Result<()> {
        if BasketRepository::new(self.pool).delete(id).await? {
            Ok(())
        } else {
            Err(AppError::LineNotFound)
        }
    }

    async fn resolve_user(&self, telegram_id: &TelegramId) -> Result<BotUser> {
        UserRepository::new(self.pool)
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Resolve a variant and require its shop to be open.
    async fn resolve_open_variant(
        &self,
        variant_id: bazaar_core::VariantId,
    ) -> Result<VariantWithShop> {
        let resolved = variant_with_shop(self.pool, variant_id)
            .await?
            .ok_or(AppError::VariantNotFound)?;

        if !resolved.is_shop_open(Utc::now()) {
            return Err(AppError::InactiveShop);
        }

        Ok(resolved)
    }
}
