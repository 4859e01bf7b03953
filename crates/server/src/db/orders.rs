//! Order repository: frozen snapshots plus status updates.
//!
//! Order assembly spans several statements; the executor-taking helpers let
//! the order service run them inside one transaction. Everything else works
//! off the pool.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{OrderId, OrderItemId, OrderStatus, ShopId, UserId, VariantId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderItemView};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    address: String,
    status: String,
    total_price: Decimal,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            address: row.address,
            status,
            total_price: row.total_price,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, address, status, total_price, comment, created_at";

/// Insert the order row with status `new` and a provisional total of 0.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert_order<'e, E>(
    executor: E,
    user_id: UserId,
    address: &str,
    comment: Option<&str>,
) -> Result<Order, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "INSERT INTO orders (user_id, address, comment) \
         VALUES ($1, $2, $3) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(user_id.as_i32())
    .bind(address)
    .bind(comment)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Insert one item snapshot for an order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert_item<'e, E>(
    executor: E,
    order_id: OrderId,
    variant_id: VariantId,
    quantity: i32,
) -> Result<OrderItem, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, (i32, i32, Option<i32>, i32)>(
        "INSERT INTO order_items (order_id, product_variant_id, quantity) \
         VALUES ($1, $2, $3) \
         RETURNING id, order_id, product_variant_id, quantity",
    )
    .bind(order_id.as_i32())
    .bind(variant_id.as_i32())
    .bind(quantity)
    .fetch_one(executor)
    .await?;

    Ok(OrderItem {
        id: OrderItemId::new(row.0),
        order_id: OrderId::new(row.1),
        product_variant_id: row.2.map(VariantId::new),
        quantity: row.3,
    })
}

/// Freeze the order's total price.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn set_total_price<'e, E>(
    executor: E,
    order_id: OrderId,
    total: Decimal,
) -> Result<(), RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query("UPDATE orders SET total_price = $2 WHERE id = $1")
        .bind(order_id.as_i32())
        .bind(total)
        .execute(executor)
        .await?;

    Ok(())
}

/// Repository for order reads and status updates.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Item snapshots for an order, resolved against the live catalog.
    ///
    /// Catalog columns go `NULL` (and the view fields `None`) when the
    /// variant has since been deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItemView>, RepositoryError> {
        #[derive(Debug, sqlx::FromRow)]
        struct ItemViewRow {
            id: i32,
            product_variant_id: Option<i32>,
            quantity: i32,
            product_name: Option<String>,
            price: Option<Decimal>,
            color: Option<String>,
            size: Option<String>,
        }

        let rows = sqlx::query_as::<_, ItemViewRow>(
            "SELECT i.id, i.product_variant_id, i.quantity, \
                    p.name AS product_name, v.price, v.color, v.size \
             FROM order_items i \
             LEFT JOIN product_variants v ON v.id = i.product_variant_id \
             LEFT JOIN products p ON p.id = v.product_id \
             WHERE i.order_id = $1 \
             ORDER BY i.id ASC",
        )
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderItemView {
                id: OrderItemId::new(row.id),
                product_variant_id: row.product_variant_id.map(VariantId::new),
                quantity: row.quantity,
                product_name: row.product_name,
                price: row.price,
                color: row.color,
                size: row.size,
            })
            .collect())
    }

    /// A user's orders within one shop, newest first.
    ///
    /// Scoped through the items' variants because orders themselves carry no
    /// shop column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT DISTINCT o.id, o.user_id, o.address, o.status, \
                    o.total_price, o.comment, o.created_at \
             FROM orders o \
             INNER JOIN order_items i ON i.order_id = o.id \
             INNER JOIN product_variants v ON v.id = i.product_variant_id \
             INNER JOIN products p ON p.id = v.product_id \
             WHERE o.user_id = $1 AND p.shop_id = $2 \
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(user_id.as_i32())
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// All orders placed against one shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list_for_shop(&self, shop_id: ShopId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT DISTINCT o.id, o.user_id, o.address, o.status, \
                    o.total_price, o.comment, o.created_at \
             FROM orders o \
             INNER JOIN order_items i ON i.order_id = o.id \
             INNER JOIN product_variants v ON v.id = i.product_variant_id \
             INNER JOIN products p ON p.id = v.product_id \
             WHERE p.shop_id = $1 \
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Persist a new status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(status.to_string())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
