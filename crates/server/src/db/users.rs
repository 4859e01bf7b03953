//! User repository for database operations.
//!
//! Users double as the identity store: the bot front-end resolves people by
//! their opaque Telegram handle, and registration is keyed on the phone
//! number so a re-registration from a new Telegram account rebinds the
//! identity fields instead of duplicating the user.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{AddressId, Locale, ShopId, TelegramId, UserId};

use super::RepositoryError;
use crate::models::user::{BotUser, RegisterUserInput, UpdateUserInput, UserAddress};

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct BotUserRow {
    id: i32,
    telegram_id: String,
    phone_number: String,
    telegram_username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    language: String,
    active_shop_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BotUserRow> for BotUser {
    type Error = RepositoryError;

    fn try_from(row: BotUserRow) -> Result<Self, Self::Error> {
        let language: Locale = row.language.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid language in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            telegram_id: TelegramId::new(row.telegram_id),
            phone_number: row.phone_number,
            telegram_username: row.telegram_username,
            first_name: row.first_name,
            last_name: row.last_name,
            language,
            active_shop_id: row.active_shop_id.map(ShopId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    full_address: String,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for UserAddress {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            user_id: UserId::new(row.user_id),
            full_address: row.full_address,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, telegram_id, phone_number, telegram_username, first_name, \
                            last_name, language, active_shop_id, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a user by their opaque Telegram handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored language is invalid.
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: &TelegramId,
    ) -> Result<Option<BotUser>, RepositoryError> {
        let row = sqlx::query_as::<_, BotUserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM bot_users WHERE telegram_id = $1"
        ))
        .bind(telegram_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(BotUser::try_from).transpose()
    }

    /// Get a user by their internal ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored language is invalid.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<BotUser>, RepositoryError> {
        let row = sqlx::query_as::<_, BotUserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM bot_users WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(BotUser::try_from).transpose()
    }

    /// Register a user, or rebind an existing one found by phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the Telegram handle is already
    /// bound to a different phone number.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn register(&self, input: &RegisterUserInput) -> Result<BotUser, RepositoryError> {
        let row = sqlx::query_as::<_, BotUserRow>(&format!(
            "INSERT INTO bot_users \
                 (phone_number, telegram_id, telegram_username, first_name, last_name, language) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (phone_number) DO UPDATE SET \
                 telegram_id = EXCLUDED.telegram_id, \
                 telegram_username = EXCLUDED.telegram_username, \
                 first_name = EXCLUDED.first_name, \
                 last_name = EXCLUDED.last_name, \
                 language = EXCLUDED.language, \
                 updated_at = now() \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&input.phone_number)
        .bind(input.telegram_id.as_str())
        .bind(&input.telegram_username)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.language.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "telegram_id already bound to another user".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        input: &UpdateUserInput,
    ) -> Result<BotUser, RepositoryError> {
        let row = sqlx::query_as::<_, BotUserRow>(&format!(
            "UPDATE bot_users SET \
                 phone_number = COALESCE($2, phone_number), \
                 telegram_username = COALESCE($3, telegram_username), \
                 first_name = COALESCE($4, first_name), \
                 last_name = COALESCE($5, last_name), \
                 language = COALESCE($6, language), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.phone_number)
        .bind(&input.telegram_username)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.language.map(|l| l.to_string()))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Point the user at a shop.
    ///
    /// # Returns
    ///
    /// `true` if the user existed and was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_active_shop(
        &self,
        id: UserId,
        shop_id: ShopId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE bot_users SET active_shop_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(shop_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach a new address to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_address(
        &self,
        user_id: UserId,
        full_address: &str,
    ) -> Result<UserAddress, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            "INSERT INTO user_addresses (user_id, full_address) \
             VALUES ($1, $2) \
             RETURNING id, user_id, full_address, created_at",
        )
        .bind(user_id.as_i32())
        .bind(full_address)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List a user's saved addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_addresses(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserAddress>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            "SELECT id, user_id, full_address, created_at \
             FROM user_addresses \
             WHERE user_id = $1 \
             ORDER BY created_at ASC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Resolve an address reference, checking it belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_address(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<UserAddress>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            "SELECT id, user_id, full_address, created_at \
             FROM user_addresses \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete an address.
    ///
    /// # Returns
    ///
    /// `true` if the address was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_address(&self, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM user_addresses WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
