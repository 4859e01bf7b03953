//! Shop repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{ShopId, UserId};

use super::RepositoryError;
use crate::models::catalog::{CreateShopInput, Shop, UpdateShopInput};

/// Internal row type for shop queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i32,
    owner_id: i32,
    shop_code: String,
    shop_name: String,
    phone_number: Option<String>,
    description: Option<String>,
    telegram_group: Option<String>,
    telegram_channel: Option<String>,
    instagram_url: Option<String>,
    is_active: bool,
    subscription_start: Option<DateTime<Utc>>,
    subscription_end: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: ShopId::new(row.id),
            owner_id: UserId::new(row.owner_id),
            shop_code: row.shop_code,
            shop_name: row.shop_name,
            phone_number: row.phone_number,
            description: row.description,
            telegram_group: row.telegram_group,
            telegram_channel: row.telegram_channel,
            instagram_url: row.instagram_url,
            is_active: row.is_active,
            subscription_start: row.subscription_start,
            subscription_end: row.subscription_end,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SHOP_COLUMNS: &str = "id, owner_id, shop_code, shop_name, phone_number, description, \
                            telegram_group, telegram_channel, instagram_url, is_active, \
                            subscription_start, subscription_end, created_at, updated_at";

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new shop. Shops start inactive until a subscription is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the shop code is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner_id: UserId,
        input: &CreateShopInput,
    ) -> Result<Shop, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "INSERT INTO shops \
                 (owner_id, shop_code, shop_name, phone_number, description, \
                  telegram_group, telegram_channel, instagram_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SHOP_COLUMNS}"
        ))
        .bind(owner_id.as_i32())
        .bind(&input.shop_code)
        .bind(&input.shop_name)
        .bind(&input.phone_number)
        .bind(&input.description)
        .bind(&input.telegram_group)
        .bind(&input.telegram_channel)
        .bind(&input.instagram_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("shop code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a shop by its unique code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_code(&self, shop_code: &str) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE shop_code = $1"
        ))
        .bind(shop_code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Apply a partial shop update (subscription, activation, wiring).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ShopId,
        input: &UpdateShopInput,
    ) -> Result<Shop, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "UPDATE shops SET \
                 shop_name = COALESCE($2, shop_name), \
                 phone_number = COALESCE($3, phone_number), \
                 description = COALESCE($4, description), \
                 telegram_group = COALESCE($5, telegram_group), \
                 is_active = COALESCE($6, is_active), \
                 subscription_start = COALESCE($7, subscription_start), \
                 subscription_end = COALESCE($8, subscription_end), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {SHOP_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.shop_name)
        .bind(&input.phone_number)
        .bind(&input.description)
        .bind(&input.telegram_group)
        .bind(input.is_active)
        .bind(input.subscription_start)
        .bind(input.subscription_end)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// List all shops, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
