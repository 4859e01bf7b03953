//! Catalog repository: categories, products, variants, and favorites.
//!
//! Variant writes always receive already-normalized pricing (the derivation
//! rule runs in the catalog service before anything reaches this module).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{CategoryId, FavoriteId, ProductId, ShopId, UserId, VariantId};

use super::RepositoryError;
use crate::models::catalog::{
    FavoriteProduct, Product, ProductCategory, ProductFilter, ProductVariant, UpdateProductInput,
};

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    shop_id: i32,
    name: String,
}

impl From<CategoryRow> for ProductCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            name: row.name,
        }
    }
}

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    shop_id: i32,
    category_id: Option<i32>,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            category_id: row.category_id.map(CategoryId::new),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for variant queries.
#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
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

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
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
        }
    }
}

/// Internal row type for a variant joined with its product and shop.
#[derive(Debug, sqlx::FromRow)]
struct VariantWithShopRow {
    id: i32,
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
    product_name: String,
    shop_id: i32,
    shop_code: String,
    shop_is_active: bool,
    subscription_start: Option<DateTime<Utc>>,
    subscription_end: Option<DateTime<Utc>>,
    telegram_group: Option<String>,
}

/// A variant resolved together with its product and owning shop, as needed
/// by basket checks and order assembly.
#[derive(Debug, Clone)]
pub struct VariantWithShop {
    pub variant: ProductVariant,
    pub product_name: String,
    pub shop_id: ShopId,
    pub shop_code: String,
    pub shop_is_active: bool,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    /// Chat id of the shop's order notification group.
    pub telegram_group: Option<String>,
}

impl VariantWithShop {
    /// Whether the owning shop is open for business at `now`.
    #[must_use]
    pub fn is_shop_open(&self, now: DateTime<Utc>) -> bool {
        if !self.shop_is_active {
            return false;
        }
        if self.subscription_start.is_some_and(|start| start > now) {
            return false;
        }
        self.subscription_end.is_some_and(|end| end > now)
    }
}

impl From<VariantWithShopRow> for VariantWithShop {
    fn from(row: VariantWithShopRow) -> Self {
        Self {
            variant: ProductVariant {
                id: VariantId::new(row.id),
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
            product_name: row.product_name,
            shop_id: ShopId::new(row.shop_id),
            shop_code: row.shop_code,
            shop_is_active: row.shop_is_active,
            subscription_start: row.subscription_start,
            subscription_end: row.subscription_end,
            telegram_group: row.telegram_group,
        }
    }
}

const VARIANT_COLUMNS: &str = "id, product_id, color, size, volume, taste, price, \
                               discount_price, discount_percent, stock, is_active";

const VARIANT_WITH_SHOP_SQL: &str = "SELECT \
         v.id, v.product_id, v.color, v.size, v.volume, v.taste, v.price, \
         v.discount_price, v.discount_percent, v.stock, v.is_active, \
         p.name AS product_name, \
         s.id AS shop_id, s.shop_code, s.is_active AS shop_is_active, \
         s.subscription_start, s.subscription_end, s.telegram_group \
     FROM product_variants v \
     INNER JOIN products p ON p.id = v.product_id \
     INNER JOIN shops s ON s.id = p.shop_id \
     WHERE v.id = $1";

/// Resolve a variant together with its product and shop.
///
/// Takes any executor so order assembly can run it inside its transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn variant_with_shop<'e, E>(
    executor: E,
    id: VariantId,
) -> Result<Option<VariantWithShop>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, VariantWithShopRow>(VARIANT_WITH_SHOP_SQL)
        .bind(id.as_i32())
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Into::into))
}

/// Values written for a variant; pricing fields arrive normalized.
#[derive(Debug, Clone)]
pub struct VariantWrite {
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

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken in this shop.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        shop_id: ShopId,
        name: &str,
    ) -> Result<ProductCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO product_categories (shop_id, name) \
             VALUES ($1, $2) \
             RETURNING id, shop_id, name",
        )
        .bind(shop_id.as_i32())
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// List a shop's categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(
        &self,
        shop_id: ShopId,
    ) -> Result<Vec<ProductCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, shop_id, name FROM product_categories WHERE shop_id = $1 ORDER BY name",
        )
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product and its initial variants in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate variant combination.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_product_with_variants(
        &self,
        shop_id: ShopId,
        category_id: Option<CategoryId>,
        name: &str,
        description: Option<&str>,
        variants: &[VariantWrite],
    ) -> Result<(Product, Vec<ProductVariant>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product_row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (shop_id, category_id, name, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, shop_id, category_id, name, description, created_at, updated_at",
        )
        .bind(shop_id.as_i32())
        .bind(category_id.map(|c| c.as_i32()))
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        let product: Product = product_row.into();

        let mut created = Vec::with_capacity(variants.len());
        for write in variants {
            let row = insert_variant(&mut *tx, product.id, write).await?;
            created.push(row);
        }

        tx.commit().await?;

        Ok((product, created))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, shop_id, category_id, name, description, created_at, updated_at \
             FROM products WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a shop's products, newest first, with optional filtering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        shop_id: ShopId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let name_pattern = filter.name.as_ref().map(|n| format!("%{n}%"));

        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, shop_id, category_id, name, description, created_at, updated_at \
             FROM products \
             WHERE shop_id = $1 \
               AND ($2::int IS NULL OR category_id = $2) \
               AND ($3::text IS NULL OR name ILIKE $3) \
             ORDER BY created_at DESC",
        )
        .bind(shop_id.as_i32())
        .bind(filter.cat.map(|c| c.as_i32()))
        .bind(name_pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a partial product update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET \
                 category_id = COALESCE($2, category_id), \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, shop_id, category_id, name, description, created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(input.category_id.map(|c| c.as_i32()))
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product (variants cascade).
    ///
    /// # Returns
    ///
    /// `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Get a variant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        id: VariantId,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a product's variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE product_id = $1 ORDER BY id"
        ))
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the variants of several products at once (for listing views).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants \
             WHERE product_id = ANY($1) ORDER BY product_id, id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a variant for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the attribute combination
    /// already exists for this product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        write: &VariantWrite,
    ) -> Result<ProductVariant, RepositoryError> {
        insert_variant(self.pool, product_id, write).await
    }

    /// Overwrite a variant with merged, re-normalized values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_variant(
        &self,
        id: VariantId,
        write: &VariantWrite,
    ) -> Result<ProductVariant, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "UPDATE product_variants SET \
                 color = $2, size = $3, volume = $4, taste = $5, \
                 price = $6, discount_price = $7, discount_percent = $8, \
                 stock = $9, is_active = $10 \
             WHERE id = $1 \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&write.color)
        .bind(&write.size)
        .bind(&write.volume)
        .bind(&write.taste)
        .bind(write.price)
        .bind(write.discount_price)
        .bind(write.discount_percent)
        .bind(write.stock)
        .bind(write.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a variant.
    ///
    /// # Returns
    ///
    /// `true` if the variant was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_variant(&self, id: VariantId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_variants WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Distinct colors a product is available in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn distinct_colors(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<String>, RepositoryError> {
        let colors = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT color FROM product_variants \
             WHERE product_id = $1 AND color IS NOT NULL ORDER BY color",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(colors)
    }

    /// Distinct sizes a product is available in, optionally within one color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn distinct_sizes(
        &self,
        product_id: ProductId,
        color: Option<&str>,
    ) -> Result<Vec<String>, RepositoryError> {
        let sizes = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT size FROM product_variants \
             WHERE product_id = $1 \
               AND size IS NOT NULL \
               AND ($2::text IS NULL OR color = $2) \
             ORDER BY size",
        )
        .bind(product_id.as_i32())
        .bind(color)
        .fetch_all(self.pool)
        .await?;

        Ok(sizes)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Find a user's favorite entry for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_favorite(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<FavoriteProduct>, RepositoryError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            "SELECT id, user_id, product_id, added_at FROM favorite_products \
             WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Bookmark a product for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if already favorited.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<FavoriteProduct, RepositoryError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            "INSERT INTO favorite_products (user_id, product_id) \
             VALUES ($1, $2) \
             RETURNING id, user_id, product_id, added_at",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product already in favorites".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// List a user's favorited products within one shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_favorites(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<Vec<(FavoriteProduct, Product)>, RepositoryError> {
        #[derive(Debug, sqlx::FromRow)]
        struct FavoriteJoinRow {
            id: i32,
            user_id: i32,
            product_id: i32,
            added_at: DateTime<Utc>,
            shop_id: i32,
            category_id: Option<i32>,
            name: String,
            description: Option<String>,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, FavoriteJoinRow>(
            "SELECT f.id, f.user_id, f.product_id, f.added_at, \
                    p.shop_id, p.category_id, p.name, p.description, \
                    p.created_at, p.updated_at \
             FROM favorite_products f \
             INNER JOIN products p ON p.id = f.product_id \
             WHERE f.user_id = $1 AND p.shop_id = $2 \
             ORDER BY f.added_at DESC",
        )
        .bind(user_id.as_i32())
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    FavoriteProduct {
                        id: FavoriteId::new(row.id),
                        user_id: UserId::new(row.user_id),
                        product_id: ProductId::new(row.product_id),
                        added_at: row.added_at,
                    },
                    Product {
                        id: ProductId::new(row.product_id),
                        shop_id: ShopId::new(row.shop_id),
                        category_id: row.category_id.map(CategoryId::new),
                        name: row.name,
                        description: row.description,
                        created_at: row.created_at,
                        updated_at: row.updated_at,
                    },
                )
            })
            .collect())
    }

    /// Favorite ids for a set of products, for marking listing views.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn favorite_ids_for_products(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<Vec<(ProductId, FavoriteId)>, RepositoryError> {
        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, (i32, i32)>(
            "SELECT product_id, id FROM favorite_products \
             WHERE user_id = $1 AND product_id = ANY($2)",
        )
        .bind(user_id.as_i32())
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, id)| (ProductId::new(product_id), FavoriteId::new(id)))
            .collect())
    }

    /// Remove a favorite, checking ownership.
    ///
    /// # Returns
    ///
    /// `true` if the favorite was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_favorite(
        &self,
        id: FavoriteId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM favorite_products WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for favorite queries.
#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    added_at: DateTime<Utc>,
}

impl From<FavoriteRow> for FavoriteProduct {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            added_at: row.added_at,
        }
    }
}

/// Insert one variant row; shared by product creation and the variant route.
async fn insert_variant<'e, E>(
    executor: E,
    product_id: ProductId,
    write: &VariantWrite,
) -> Result<ProductVariant, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, VariantRow>(&format!(
        "INSERT INTO product_variants \
             (product_id, color, size, volume, taste, price, \
              discount_price, discount_percent, stock, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {VARIANT_COLUMNS}"
    ))
    .bind(product_id.as_i32())
    .bind(&write.color)
    .bind(&write.size)
    .bind(&write.volume)
    .bind(&write.taste)
    .bind(write.price)
    .bind(write.discount_price)
    .bind(write.discount_percent)
    .bind(write.stock)
    .bind(write.is_active)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(
                "variant with this attribute combination already exists".to_owned(),
            );
        }
        RepositoryError::Database(e)
    })?;

    Ok(row.into())
}
