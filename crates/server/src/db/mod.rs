//! Database operations for the backend `PostgreSQL`.
//!
//! ## Tables
//!
//! - `bot_users` / `user_addresses` - customers and their saved addresses
//! - `shops` - tenant shops with subscription windows
//! - `product_categories` / `products` / `product_variants` - the catalog
//! - `favorite_products` - per-user product bookmarks
//! - `basket_lines` - the mutable pre-order ledger
//! - `orders` / `order_items` - frozen order snapshots
//!
//! Queries use the runtime sqlx API with `#[derive(sqlx::FromRow)]` row
//! structs converted into the models of `crate::models`, so the crate builds
//! without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod basket;
pub mod catalog;
pub mod orders;
pub mod shops;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use basket::BasketRepository;
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use shops::ShopRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate shop code).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
