//! Basket ledger repository.
//!
//! The ledger itself: one row per (user, variant), replace-on-upsert. The
//! order assembler consumes rows through the executor-taking helpers so the
//! deletes join its transaction.

use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{BasketLineId, ProductId, ShopId, UserId, VariantId};

use super::RepositoryError;
use crate::models::basket::{BasketLine, BasketLineView};
use crate::models::catalog::ProductVariant;

/// Internal row type for basket line queries.
#[derive(Debug, sqlx::FromRow)]
struct BasketLineRow {
    id: i32,
    user_id: i32,
    shop_id: i32,
    product_variant_id: i32,
    quantity: i32,
}

impl From<BasketLineRow> for BasketLine {
    fn from(row: BasketLineRow) -> Self {
        Self {
            id: BasketLineId::new(row.id),
            user_id: UserId::new(row.user_id),
            shop_id: ShopId::new(row.shop_id),
            product_variant_id: VariantId::new(row.product_variant_id),
            quantity: row.quantity,
        }
    }
}

const LINE_COLUMNS: &str = "id, user_id, shop_id, product_variant_id, quantity";

/// Fetch a basket line by id, on any executor.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_line<'e, E>(
    executor: E,
    id: BasketLineId,
) -> Result<Option<BasketLine>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, BasketLineRow>(&format!(
        "SELECT {LINE_COLUMNS} FROM basket_lines WHERE id = $1"
    ))
    .bind(id.as_i32())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Into::into))
}

/// Delete a basket line by id, on any executor.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete_line<'e, E>(executor: E, id: BasketLineId) -> Result<bool, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM basket_lines WHERE id = $1")
        .bind(id.as_i32())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Repository for basket ledger operations.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    /// Create a new basket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the line a user holds for a variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_variant(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> Result<Option<BasketLine>, RepositoryError> {
        let row = sqlx::query_as::<_, BasketLineRow>(&format!(
            "SELECT {LINE_COLUMNS} FROM basket_lines \
             WHERE user_id = $1 AND product_variant_id = $2"
        ))
        .bind(user_id.as_i32())
        .bind(variant_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create the (user, variant) line or replace its quantity.
    ///
    /// Replace semantics: the stored quantity becomes exactly `quantity`,
    /// it is never added to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_line(
        &self,
        user_id: UserId,
        shop_id: ShopId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<BasketLine, RepositoryError> {
        let row = sqlx::query_as::<_, BasketLineRow>(&format!(
            "INSERT INTO basket_lines (user_id, shop_id, product_variant_id, quantity) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_variant_id) DO UPDATE SET \
                 quantity = EXCLUDED.quantity, \
                 updated_at = now() \
             RETURNING {LINE_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(shop_id.as_i32())
        .bind(variant_id.as_i32())
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        id: BasketLineId,
        quantity: i32,
    ) -> Result<BasketLine, RepositoryError> {
        let row = sqlx::query_as::<_, BasketLineRow>(&format!(
            "UPDATE basket_lines SET quantity = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {LINE_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Remove the (user, variant) line if present.
    ///
    /// # Returns
    ///
    /// `true` if a line was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_variant(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM basket_lines WHERE user_id = $1 AND product_variant_id = $2")
                .bind(user_id.as_i32())
                .bind(variant_id.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a line by id.
    ///
    /// # Returns
    ///
    /// `true` if the line was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BasketLineId) -> Result<bool, RepositoryError> {
        delete_line(self.pool, id).await
    }

    /// List a user's lines in one shop, resolved to live variant snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_shop(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<Vec<BasketLineView>, RepositoryError> {
        #[derive(Debug, sqlx::FromRow)]
        struct LineViewRow {
            id: i32,
            quantity: i32,
            product_name: String,
            variant_id: i32,
            product_id: i32,
            color: Option<String>,
            size: Option<String>,
            volume: Option<String>,
            taste: Option<String>,
            price: Decimal,
            discount_price: Option<Decimal>,
            discount_percent: Option<i32>,
            stock: i32,
            is_active: bool,
        }

        let rows = sqlx::query_as::<_, LineViewRow>(
            "SELECT b.id, b.quantity, p.name AS product_name, \
                    v.id AS variant_id, v.product_id, v.color, v.size, v.volume, v.taste, \
                    v.price, v.discount_price, v.discount_percent, v.stock, v.is_active \
             FROM basket_lines b \
             INNER JOIN product_variants v ON v.id = b.product_variant_id \
             INNER JOIN products p ON p.id = v.product_id \
             WHERE b.user_id = $1 AND b.shop_id = $2 \
             ORDER BY b.created_at ASC",
        )
        .bind(user_id.as_i32())
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| BasketLineView {
                id: BasketLineId::new(row.id),
                quantity: row.quantity,
                product_name: row.product_name,
                variant: ProductVariant {
                    id: VariantId::new(row.variant_id),
                    product_id: ProductId::new(row.product_id),
                    color: row.color,
                    size: row.size,
                    volume: row.volume,
                    taste: row.taste,
                    price: row.price,
                    discount_price: row.discount_price,
                    discount_percent: row.discount_percent,
                    stock: row.stock,
                    is_active: row.is_active,
                },
            })
            .collect())
    }

    /// Number of lines a user still holds in a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_shop(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM basket_lines WHERE user_id = $1 AND shop_id = $2",
        )
        .bind(user_id.as_i32())
        .bind(shop_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
