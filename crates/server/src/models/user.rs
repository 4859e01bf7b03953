//! Bot users and their delivery addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AddressId, Locale, ShopId, TelegramId, UserId};

/// A customer or shop owner registered through the bot.
#[derive(Debug, Clone, Serialize)]
pub struct BotUser {
    pub id: UserId,
    pub telegram_id: TelegramId,
    pub phone_number: String,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language: Locale,
    /// The shop the user is currently browsing, if any.
    pub active_shop_id: Option<ShopId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BotUser {
    /// First and last name joined with a space, empty parts dropped.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut name = String::new();
        if let Some(first) = self.first_name.as_deref() {
            name.push_str(first);
        }
        if let Some(last) = self.last_name.as_deref() {
            if !name.is_empty() {
                name.push(' ');
            }
            name.push_str(last);
        }
        name
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, Serialize)]
pub struct UserAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub full_address: String,
    pub created_at: DateTime<Utc>,
}

/// Registration request from the bot front-end.
///
/// Registration is keyed on the phone number: an existing user re-registering
/// from a new Telegram account gets their identity fields rebound.
#[derive(Debug, Deserialize)]
pub struct RegisterUserInput {
    pub phone_number: String,
    pub telegram_id: TelegramId,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub language: Locale,
}

/// Partial profile update; absent fields are left untouched.
///
/// `addresses` only ever appends — existing addresses are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserInput {
    pub phone_number: Option<String>,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language: Option<Locale>,
    pub addresses: Option<Vec<NewAddressInput>>,
}

/// A new address to attach to a user.
#[derive(Debug, Deserialize)]
pub struct NewAddressInput {
    pub full_address: String,
}

/// Request to point a user at a shop.
#[derive(Debug, Deserialize)]
pub struct SetActiveShopInput {
    pub telegram_id: TelegramId,
    pub shop_code: String,
}

/// User profile as returned to the bot, addresses included.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub telegram_id: TelegramId,
    pub phone_number: String,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub language: Locale,
    pub active_shop_id: Option<ShopId>,
    pub addresses: Vec<AddressView>,
}

/// Address as embedded in [`UserView`].
#[derive(Debug, Serialize)]
pub struct AddressView {
    pub id: AddressId,
    pub full_address: String,
}

impl UserView {
    /// Assemble the view from a user and their addresses.
    #[must_use]
    pub fn from_parts(user: BotUser, addresses: Vec<UserAddress>) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            telegram_id: user.telegram_id,
            phone_number: user.phone_number,
            telegram_username: user.telegram_username,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            language: user.language,
            active_shop_id: user.active_shop_id,
            addresses: addresses
                .into_iter()
                .map(|a| AddressView {
                    id: a.id,
                    full_address: a.full_address,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> BotUser {
        BotUser {
            id: UserId::new(1),
            telegram_id: TelegramId::new("42"),
            phone_number: "+998901234567".to_owned(),
            telegram_username: None,
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            language: Locale::Uz,
            active_shop_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name_joins_parts() {
        assert_eq!(user(Some("Ali"), Some("Valiyev")).full_name(), "Ali Valiyev");
        assert_eq!(user(Some("Ali"), None).full_name(), "Ali");
        assert_eq!(user(None, Some("Valiyev")).full_name(), "Valiyev");
        assert_eq!(user(None, None).full_name(), "");
    }
}
