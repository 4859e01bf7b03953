//! Shops and the product catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::{CategoryId, FavoriteId, Pricing, ProductId, ShopId, UserId, VariantId};

/// A tenant shop.
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    pub id: ShopId,
    pub owner_id: UserId,
    pub shop_code: String,
    pub shop_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    /// Chat id of the Telegram group receiving order notifications.
    pub telegram_group: Option<String>,
    pub telegram_channel: Option<String>,
    pub instagram_url: Option<String>,
    pub is_active: bool,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Whether the shop is open for business at `now`.
    ///
    /// Requires the active flag plus a subscription window containing `now`;
    /// a shop with no subscription end is closed.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if self.subscription_start.is_some_and(|start| start > now) {
            return false;
        }
        self.subscription_end.is_some_and(|end| end > now)
    }
}

/// Request to register a shop.
#[derive(Debug, Deserialize)]
pub struct CreateShopInput {
    pub owner_telegram_id: bazaar_core::TelegramId,
    pub shop_code: String,
    pub shop_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub telegram_group: Option<String>,
    pub telegram_channel: Option<String>,
    pub instagram_url: Option<String>,
}

/// Partial shop update, used by the platform operator to manage
/// subscriptions and notification wiring.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateShopInput {
    pub shop_name: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub telegram_group: Option<String>,
    pub is_active: Option<bool>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
}

/// Availability check result for a shop code.
#[derive(Debug, Serialize)]
pub struct ShopCheck {
    pub shop_code: String,
    pub is_active: bool,
}

/// A per-shop product category.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCategory {
    pub id: CategoryId,
    pub shop_id: ShopId,
    pub name: String,
}

/// Request to create a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

/// A listed product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub volume: Option<String>,
    pub taste: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub stock: i32,
    pub is_active: bool,
}

impl ProductVariant {
    /// The variant's pricing pair, for discount checks and totals.
    #[must_use]
    pub const fn pricing(&self) -> Pricing {
        Pricing {
            price: self.price,
            discount_price: self.discount_price,
            discount_percent: self.discount_percent,
        }
    }

    /// The unit price a buyer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.pricing().effective_price()
    }
}

/// Request to create a product, optionally with its initial variants.
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub shop_code: String,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Vec<CreateVariantInput>,
}

/// Partial product update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request to create a variant. The pricing rule derives whichever discount
/// field is missing before the row is written.
#[derive(Debug, Deserialize)]
pub struct CreateVariantInput {
    pub color: Option<String>,
    pub size: Option<String>,
    pub volume: Option<String>,
    pub taste: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request to add a variant to an existing product.
#[derive(Debug, Deserialize)]
pub struct CreateVariantForProductInput {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub variant: CreateVariantInput,
}

/// Partial variant update; the pricing rule reruns on every write.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVariantInput {
    pub color: Option<String>,
    pub size: Option<String>,
    pub volume: Option<String>,
    pub taste: Option<String>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

const fn default_true() -> bool {
    true
}

/// Query filter for product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    /// Category id to restrict to.
    pub cat: Option<CategoryId>,
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Caller identity, used to mark favorites.
    pub telegram_id: Option<bazaar_core::TelegramId>,
}

/// A product with its variants, as listed to the bot.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<ProductVariant>,
    /// Set when the requesting user has favorited this product.
    pub favorite_id: Option<FavoriteId>,
}

impl ProductView {
    /// Assemble the view from a product and its variants.
    #[must_use]
    pub fn from_parts(
        product: Product,
        variants: Vec<ProductVariant>,
        favorite_id: Option<FavoriteId>,
    ) -> Self {
        Self {
            id: product.id,
            shop_id: product.shop_id,
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            variants,
            favorite_id,
        }
    }
}

/// A favorited product reference.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteProduct {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Request to favorite a product.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteInput {
    pub telegram_id: bazaar_core::TelegramId,
    pub product_id: ProductId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn shop(is_active: bool, start: Option<i64>, end: Option<i64>) -> Shop {
        let now = Utc::now();
        Shop {
            id: ShopId::new(1),
            owner_id: UserId::new(1),
            shop_code: "demo".to_owned(),
            shop_name: "Demo".to_owned(),
            phone_number: None,
            description: None,
            telegram_group: None,
            telegram_channel: None,
            instagram_url: None,
            is_active,
            subscription_start: start.map(|d| now + Duration::days(d)),
            subscription_end: end.map(|d| now + Duration::days(d)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_shop_open_requires_flag_and_window() {
        let now = Utc::now();
        assert!(shop(true, Some(-1), Some(30)).is_open(now));
        assert!(shop(true, None, Some(30)).is_open(now));
        assert!(!shop(false, Some(-1), Some(30)).is_open(now));
        assert!(!shop(true, Some(-10), Some(-1)).is_open(now));
        assert!(!shop(true, Some(1), Some(30)).is_open(now));
        assert!(!shop(true, None, None).is_open(now));
    }

    #[test]
    fn test_variant_effective_price_uses_discount() {
        let variant = ProductVariant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            color: None,
            size: None,
            volume: None,
            taste: None,
            price: dec!(1000),
            discount_price: Some(dec!(800)),
            discount_percent: Some(20),
            stock: 5,
            is_active: true,
        };
        assert_eq!(variant.effective_price(), dec!(800));
    }
}
