//! Catalog service: products, variants, categories, favorites.
//!
//! All variant writes funnel through [`Pricing::normalize`] here, so the
//! discount derivation rule holds on every persist no matter which endpoint
//! triggered the write.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::{FavoriteId, Pricing, ProductId, TelegramId, VariantId};

use crate::db::catalog::{CatalogRepository, VariantWrite};
use crate::db::shops::ShopRepository;
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::catalog::{
    CreateCategoryInput, CreateProductInput, CreateVariantInput, FavoriteProduct, Product,
    ProductCategory, ProductFilter, ProductVariant, ProductView, Shop, UpdateProductInput,
    UpdateVariantInput,
};

/// Service for catalog reads and writes.
pub struct CatalogService<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category within a shop.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` for an unknown code and
    /// `AppError::Conflict` for a duplicate name.
    pub async fn create_category(
        &self,
        shop_code: &str,
        input: &CreateCategoryInput,
    ) -> Result<ProductCategory> {
        let shop = self.shop_by_code(shop_code).await?;

        match CatalogRepository::new(self.pool)
            .create_category(shop.id, &input.name)
            .await
        {
            Ok(category) => Ok(category),
            Err(RepositoryError::Conflict(msg)) => Err(AppError::Conflict(msg)),
            Err(e) => Err(e.into()),
        }
    }

    /// List a shop's categories.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` for an unknown code.
    pub async fn list_categories(&self, shop_code: &str) -> Result<Vec<ProductCategory>> {
        let shop = self.shop_by_code(shop_code).await?;
        Ok(CatalogRepository::new(self.pool)
            .list_categories(shop.id)
            .await?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product together with its initial variants.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` for an unknown shop code, a
    /// validation error for bad pricing input, and `AppError::Conflict` for
    /// a duplicate variant combination.
    #[instrument(skip(self, input), fields(shop_code = %input.shop_code))]
    pub async fn create_product(&self, input: &CreateProductInput) -> Result<ProductView> {
        let shop = self.shop_by_code(&input.shop_code).await?;

        let writes = input
            .variants
            .iter()
            .map(normalize_new_variant)
            .collect::<Result<Vec<_>>>()?;

        let (product, variants) = match CatalogRepository::new(self.pool)
            .create_product_with_variants(
                shop.id,
                input.category_id,
                &input.name,
                input.description.as_deref(),
                &writes,
            )
            .await
        {
            Ok(created) => created,
            Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
            Err(e) => return Err(e.into()),
        };

        Ok(ProductView::from_parts(product, variants, None))
    }

    /// List a shop's products with variants and favorite marks.
    ///
    /// Inactive shops list as empty, matching what the bot shows customers.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` for an unknown code.
    pub async fn list_products(
        &self,
        shop_code: &str,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductView>> {
        let shop = self.shop_by_code(shop_code).await?;
        if !shop.is_active {
            return Ok(Vec::new());
        }

        let catalog = CatalogRepository::new(self.pool);
        let products = catalog.list_products(shop.id, filter).await?;
        let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();

        let mut variants_by_product: HashMap<ProductId, Vec<ProductVariant>> = HashMap::new();
        for variant in catalog.variants_for_products(&product_ids).await? {
            variants_by_product
                .entry(variant.product_id)
                .or_default()
                .push(variant);
        }

        let favorite_marks = self
            .favorite_marks(filter.telegram_id.as_ref(), &product_ids)
            .await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let variants = variants_by_product.remove(&product.id).unwrap_or_default();
                let favorite_id = favorite_marks.get(&product.id).copied();
                ProductView::from_parts(product, variants, favorite_id)
            })
            .collect())
    }

    /// Fetch one product with variants and the caller's favorite mark.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` if it doesn't exist.
    pub async fn get_product(
        &self,
        id: ProductId,
        telegram_id: Option<&TelegramId>,
    ) -> Result<ProductView> {
        let catalog = CatalogRepository::new(self.pool);
        let product = catalog
            .get_product(id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        let variants = catalog.variants_for_product(id).await?;
        let favorite_id = self
            .favorite_marks(telegram_id, &[id])
            .await?
            .get(&id)
            .copied();

        Ok(ProductView::from_parts(product, variants, favorite_id))
    }

    /// Apply a partial product update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` if it doesn't exist.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product> {
        match CatalogRepository::new(self.pool).update_product(id, input).await {
            Ok(product) => Ok(product),
            Err(RepositoryError::NotFound) => Err(AppError::ProductNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a product and its variants.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` if it doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        if CatalogRepository::new(self.pool).delete_product(id).await? {
            Ok(())
        } else {
            Err(AppError::ProductNotFound)
        }
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Add a variant to a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for an unknown product, a
    /// validation error for bad pricing input, and `AppError::Conflict` for
    /// a duplicate attribute combination.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        input: &CreateVariantInput,
    ) -> Result<ProductVariant> {
        let catalog = CatalogRepository::new(self.pool);
        catalog
            .get_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let write = normalize_new_variant(input)?;
        match catalog.create_variant(product_id, &write).await {
            Ok(variant) => Ok(variant),
            Err(RepositoryError::Conflict(msg)) => Err(AppError::Conflict(msg)),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial variant update, re-running the pricing derivation.
    ///
    /// When the patch carries exactly one discount field the other is
    /// derived from it; when it carries neither, the stored pair is kept
    /// (and re-normalized against the possibly-new price).
    ///
    /// # Errors
    ///
    /// Returns `AppError::VariantNotFound` if it doesn't exist, or a
    /// validation error for bad pricing input.
    pub async fn update_variant(
        &self,
        id: VariantId,
        input: &UpdateVariantInput,
    ) -> Result<ProductVariant> {
        let catalog = CatalogRepository::new(self.pool);
        let existing = catalog
            .get_variant(id)
            .await?
            .ok_or(AppError::VariantNotFound)?;

        let write = merge_variant_update(&existing, input)?;
        match catalog.update_variant(id, &write).await {
            Ok(variant) => Ok(variant),
            Err(RepositoryError::NotFound) => Err(AppError::VariantNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a variant.
    ///
    /// # Errors
    ///
    /// Returns `AppError::VariantNotFound` if it doesn't exist.
    pub async fn delete_variant(&self, id: VariantId) -> Result<()> {
        if CatalogRepository::new(self.pool).delete_variant(id).await? {
            Ok(())
        } else {
            Err(AppError::VariantNotFound)
        }
    }

    /// Distinct colors a product comes in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn distinct_colors(&self, product_id: ProductId) -> Result<Vec<String>> {
        Ok(CatalogRepository::new(self.pool)
            .distinct_colors(product_id)
            .await?)
    }

    /// Distinct sizes a product comes in, optionally within one color.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn distinct_sizes(
        &self,
        product_id: ProductId,
        color: Option<&str>,
    ) -> Result<Vec<String>> {
        Ok(CatalogRepository::new(self.pool)
            .distinct_sizes(product_id, color)
            .await?)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Bookmark a product for a user.
    ///
    /// # Returns
    ///
    /// The favorite entry plus whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` / `AppError::ProductNotFound` when
    /// either side is missing.
    pub async fn add_favorite(
        &self,
        telegram_id: &TelegramId,
        product_id: ProductId,
    ) -> Result<(FavoriteProduct, bool)> {
        let user = self.user_by_telegram_id(telegram_id).await?;
        let catalog = CatalogRepository::new(self.pool);
        catalog
            .get_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if let Some(existing) = catalog.find_favorite(user.id, product_id).await? {
            return Ok((existing, false));
        }

        match catalog.add_favorite(user.id, product_id).await {
            Ok(favorite) => Ok((favorite, true)),
            // Lost a race with a concurrent add; surface the winner.
            Err(RepositoryError::Conflict(_)) => {
                let favorite = catalog
                    .find_favorite(user.id, product_id)
                    .await?
                    .ok_or(AppError::FavoriteNotFound)?;
                Ok((favorite, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's favorited products within one shop.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` / `AppError::UserNotFound` when
    /// either side is missing.
    pub async fn list_favorites(
        &self,
        shop_code: &str,
        telegram_id: &TelegramId,
    ) -> Result<Vec<ProductView>> {
        let shop = self.shop_by_code(shop_code).await?;
        let user = self.user_by_telegram_id(telegram_id).await?;

        let catalog = CatalogRepository::new(self.pool);
        let favorites = catalog.list_favorites(user.id, shop.id).await?;

        let mut views = Vec::with_capacity(favorites.len());
        for (favorite, product) in favorites {
            let variants = catalog.variants_for_product(product.id).await?;
            views.push(ProductView::from_parts(product, variants, Some(favorite.id)));
        }
        Ok(views)
    }

    /// Remove a favorite, checking ownership.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FavoriteNotFound` if it doesn't exist for this user.
    pub async fn remove_favorite(
        &self,
        id: FavoriteId,
        telegram_id: &TelegramId,
    ) -> Result<()> {
        let user = self.user_by_telegram_id(telegram_id).await?;
        if CatalogRepository::new(self.pool)
            .delete_favorite(id, user.id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::FavoriteNotFound)
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn shop_by_code(&self, shop_code: &str) -> Result<Shop> {
        ShopRepository::new(self.pool)
            .find_by_code(shop_code)
            .await?
            .ok_or(AppError::ShopNotFound)
    }

    async fn user_by_telegram_id(
        &self,
        telegram_id: &TelegramId,
    ) -> Result<crate::models::user::BotUser> {
        UserRepository::new(self.pool)
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Favorite ids for a set of products, empty for anonymous callers.
    async fn favorite_marks(
        &self,
        telegram_id: Option<&TelegramId>,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, FavoriteId>> {
        let Some(telegram_id) = telegram_id else {
            return Ok(HashMap::new());
        };
        let Some(user) = UserRepository::new(self.pool)
            .find_by_telegram_id(telegram_id)
            .await?
        else {
            // Unknown callers just see no favorite marks.
            return Ok(HashMap::new());
        };

        Ok(CatalogRepository::new(self.pool)
            .favorite_ids_for_products(user.id, product_ids)
            .await?
            .into_iter()
            .collect())
    }
}

/// Run the pricing derivation over a new variant's input.
fn normalize_new_variant(input: &CreateVariantInput) -> Result<VariantWrite> {
    let pricing = Pricing {
        price: input.price,
        discount_price: input.discount_price,
        discount_percent: input.discount_percent,
    }
    .normalize()
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(VariantWrite {
        color: input.color.clone(),
        size: input.size.clone(),
        volume: input.volume.clone(),
        taste: input.taste.clone(),
        price: pricing.price,
        discount_price: pricing.discount_price,
        discount_percent: pricing.discount_percent,
        stock: input.stock,
        is_active: input.is_active,
    })
}

/// Merge a patch over an existing variant and re-run the derivation.
fn merge_variant_update(
    existing: &ProductVariant,
    input: &UpdateVariantInput,
) -> Result<VariantWrite> {
    let price = input.price.unwrap_or(existing.price);

    // A patch supplying part of the discount pair rederives the rest from
    // the patch alone; an untouched pair is re-normalized against the
    // (possibly new) price.
    let pricing = match (input.discount_price, input.discount_percent) {
        (None, None) => Pricing {
            price,
            discount_price: existing.discount_price,
            discount_percent: existing.discount_percent,
        },
        (discount_price, discount_percent) => Pricing {
            price,
            discount_price,
            discount_percent,
        },
    }
    .normalize()
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(VariantWrite {
        color: input.color.clone().or_else(|| existing.color.clone()),
        size: input.size.clone().or_else(|| existing.size.clone()),
        volume: input.volume.clone().or_else(|| existing.volume.clone()),
        taste: input.taste.clone().or_else(|| existing.taste.clone()),
        price: pricing.price,
        discount_price: pricing.discount_price,
        discount_percent: pricing.discount_percent,
        stock: input.stock.unwrap_or(existing.stock),
        is_active: input.is_active.unwrap_or(existing.is_active),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{ProductId, VariantId};
    use rust_decimal_macros::dec;

    fn variant(price: rust_decimal::Decimal) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            color: Some("black".to_owned()),
            size: None,
            volume: None,
            taste: None,
            price,
            discount_price: None,
            discount_percent: None,
            stock: 10,
            is_active: true,
        }
    }

    #[test]
    fn test_new_variant_derives_discount_price() {
        let input = CreateVariantInput {
            color: None,
            size: None,
            volume: None,
            taste: None,
            price: dec!(1000),
            discount_price: None,
            discount_percent: Some(20),
            stock: 0,
            is_active: true,
        };
        let write = normalize_new_variant(&input).expect("valid input");
        assert_eq!(write.discount_price, Some(dec!(800.00)));
    }

    #[test]
    fn test_update_with_one_discount_field_rederives_other() {
        let existing = variant(dec!(1000));
        let input = UpdateVariantInput {
            discount_price: Some(dec!(750)),
            ..Default::default()
        };
        let write = merge_variant_update(&existing, &input).expect("valid input");
        assert_eq!(write.discount_percent, Some(25));
        assert_eq!(write.price, dec!(1000));
    }

    #[test]
    fn test_update_without_discount_fields_keeps_existing_pair() {
        let mut existing = variant(dec!(1000));
        existing.discount_price = Some(dec!(800));
        existing.discount_percent = Some(20);

        let input = UpdateVariantInput {
            stock: Some(3),
            ..Default::default()
        };
        let write = merge_variant_update(&existing, &input).expect("valid input");
        assert_eq!(write.discount_price, Some(dec!(800)));
        assert_eq!(write.discount_percent, Some(20));
        assert_eq!(write.stock, 3);
        assert_eq!(write.color.as_deref(), Some("black"));
    }

    #[test]
    fn test_update_rejects_negative_discount() {
        let existing = variant(dec!(1000));
        let input = UpdateVariantInput {
            discount_price: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(merge_variant_update(&existing, &input).is_err());
    }
}
