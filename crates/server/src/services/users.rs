//! User registry service.

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::{AddressId, TelegramId};

use crate::db::users::UserRepository;
use crate::db::{RepositoryError, shops::ShopRepository};
use crate::error::{AppError, Result};
use crate::models::user::{
    BotUser, RegisterUserInput, SetActiveShopInput, UpdateUserInput, UserView,
};

/// Outcome of a registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A fresh user row was written (or an existing phone rebound).
    Registered,
    /// The Telegram handle was already registered; nothing changed.
    AlreadyRegistered,
}

/// Service for user registration and profile management.
pub struct UserService<'a> {
    pool: &'a PgPool,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user coming from the bot.
    ///
    /// A handle that is already registered is left untouched; otherwise the
    /// user is found (by phone) or created, and the Telegram identity fields
    /// are rebound.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the handle is bound to another phone.
    #[instrument(skip(self, input), fields(telegram_id = %input.telegram_id))]
    pub async fn register(&self, input: &RegisterUserInput) -> Result<RegistrationOutcome> {
        let users = UserRepository::new(self.pool);

        if users.find_by_telegram_id(&input.telegram_id).await?.is_some() {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        match users.register(input).await {
            Ok(_) => Ok(RegistrationOutcome::Registered),
            Err(RepositoryError::Conflict(msg)) => Err(AppError::Conflict(msg)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a user's profile with addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` if the handle is unknown.
    pub async fn get_profile(&self, telegram_id: &TelegramId) -> Result<UserView> {
        let users = UserRepository::new(self.pool);
        let user = self.resolve(telegram_id).await?;
        let addresses = users.list_addresses(user.id).await?;
        Ok(UserView::from_parts(user, addresses))
    }

    /// Apply a partial profile update; new addresses are appended, existing
    /// ones kept.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` if the handle is unknown.
    #[instrument(skip(self, input), fields(telegram_id = %telegram_id))]
    pub async fn update_profile(
        &self,
        telegram_id: &TelegramId,
        input: &UpdateUserInput,
    ) -> Result<UserView> {
        let users = UserRepository::new(self.pool);
        let user = self.resolve(telegram_id).await?;

        let updated = match users.update_profile(user.id, input).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => return Err(AppError::UserNotFound),
            Err(e) => return Err(e.into()),
        };

        if let Some(new_addresses) = &input.addresses {
            for address in new_addresses {
                users.add_address(updated.id, &address.full_address).await?;
            }
        }

        let addresses = users.list_addresses(updated.id).await?;
        Ok(UserView::from_parts(updated, addresses))
    }

    /// Delete a saved address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AddressNotFound` if it doesn't exist.
    pub async fn delete_address(&self, id: AddressId) -> Result<()> {
        let users = UserRepository::new(self.pool);
        if users.delete_address(id).await? {
            Ok(())
        } else {
            Err(AppError::AddressNotFound)
        }
    }

    /// Point a user at the shop they are browsing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` / `AppError::ShopNotFound` when
    /// either side of the assignment is missing.
    #[instrument(skip(self, input), fields(telegram_id = %input.telegram_id, shop_code = %input.shop_code))]
    pub async fn set_active_shop(&self, input: &SetActiveShopInput) -> Result<()> {
        let users = UserRepository::new(self.pool);
        let shops = ShopRepository::new(self.pool);

        let user = self.resolve(&input.telegram_id).await?;
        let shop = shops
            .find_by_code(&input.shop_code)
            .await?
            .ok_or(AppError::ShopNotFound)?;

        if users.set_active_shop(user.id, shop.id).await? {
            Ok(())
        } else {
            Err(AppError::UserNotFound)
        }
    }

    /// Resolve a Telegram handle to its user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` if the handle is unknown.
    pub async fn resolve(&self, telegram_id: &TelegramId) -> Result<BotUser> {
        UserRepository::new(self.pool)
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
