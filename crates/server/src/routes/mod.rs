//! HTTP route handlers for the backend API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Users
//! POST   /api/users/register            - Register (or acknowledge) a user
//! GET    /api/users/{telegram_id}       - Profile with addresses
//! PATCH  /api/users/{telegram_id}       - Partial profile update
//! POST   /api/users/active-shop         - Select the shop being browsed
//! DELETE /api/addresses/{id}            - Delete a saved address
//!
//! # Shops
//! GET  /api/shops                       - List shops
//! POST /api/shops                       - Register a shop
//! GET  /api/shops/{shop_code}           - Shop detail
//! PATCH /api/shops/{shop_code}          - Subscription / activation update
//! GET  /api/shops/{shop_code}/check     - Availability check
//!
//! # Catalog
//! POST /api/shops/{shop_code}/categories - Create category
//! GET  /api/shops/{shop_code}/categories - List categories
//! POST /api/products                     - Create product (+variants)
//! GET  /api/shops/{shop_code}/products   - List products (?cat, ?name)
//! GET|PATCH|DELETE /api/products/{id}    - Product detail / update / delete
//! GET  /api/products/{id}/colors         - Distinct colors
//! GET  /api/products/{id}/sizes          - Distinct sizes (?color)
//! POST /api/variants                     - Create variant
//! PATCH|DELETE /api/variants/{id}        - Variant update / delete
//!
//! # Favorites
//! POST   /api/favorites                  - Add favorite
//! GET    /api/shops/{shop_code}/favorites - List favorites (?telegram_id)
//! DELETE /api/favorites/{id}             - Remove favorite (?telegram_id)
//!
//! # Basket
//! POST   /api/basket                     - Upsert line (replace semantics)
//! POST   /api/basket/step                - ±1 step
//! GET    /api/shops/{shop_code}/basket   - List lines (?telegram_id)
//! DELETE /api/basket/{id}                - Delete line
//!
//! # Orders
//! POST  /api/orders                      - Assemble an order
//! GET   /api/orders                      - My orders (?telegram_id)
//! GET   /api/orders/statuses             - Localized status directory
//! GET   /api/orders/{id}                 - Order detail (?telegram_id)
//! PATCH /api/orders/{id}/status          - Status transition
//! GET   /api/shops/{shop_code}/orders    - Orders placed against a shop
//! ```

pub mod basket;
pub mod orders;
pub mod products;
pub mod shops;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/active-shop", post(users::set_active_shop))
        .route(
            "/{telegram_id}",
            get(users::get_user).patch(users::patch_user),
        )
}

/// Create the shop routes router, including per-shop catalog listings.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::list).post(shops::create))
        .route("/{shop_code}", get(shops::get).patch(shops::patch))
        .route("/{shop_code}/check", get(shops::check))
        .route(
            "/{shop_code}/categories",
            get(products::list_categories).post(products::create_category),
        )
        .route("/{shop_code}/products", get(products::list_products))
        .route("/{shop_code}/favorites", get(products::list_favorites))
        .route("/{shop_code}/basket", get(basket::list))
        .route("/{shop_code}/orders", get(orders::list_for_shop))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create_product))
        .route(
            "/{id}",
            get(products::get_product)
                .patch(products::patch_product)
                .delete(products::delete_product),
        )
        .route("/{id}/colors", get(products::product_colors))
        .route("/{id}/sizes", get(products::product_sizes))
}

/// Create the variant routes router.
pub fn variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create_variant))
        .route(
            "/{id}",
            axum::routing::patch(products::patch_variant).delete(products::delete_variant),
        )
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::add_favorite))
        .route("/{id}", delete(products::delete_favorite))
}

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(basket::upsert))
        .route("/step", post(basket::step))
        .route("/{id}", delete(basket::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list_mine))
        .route("/statuses", get(orders::statuses))
        .route(
            "/{id}",
            get(orders::get),
        )
        .route("/{id}/status", axum::routing::patch(orders::update_status))
}

/// Create all routes for the backend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .route("/api/addresses/{id}", delete(users::delete_address))
        .nest("/api/shops", shop_routes())
        .nest("/api/products", product_routes())
        .nest("/api/variants", variant_routes())
        .nest("/api/favorites", favorite_routes())
        .nest("/api/basket", basket_routes())
        .nest("/api/orders", order_routes())
}
