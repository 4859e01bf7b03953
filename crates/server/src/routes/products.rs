//! Catalog route handlers: categories, products, variants, favorites.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use bazaar_core::{FavoriteId, ProductId, TelegramId, VariantId};

use crate::error::{AppError, Result};
use crate::models::catalog::{
    AddFavoriteInput, CreateCategoryInput, CreateProductInput, CreateVariantForProductInput,
    ProductFilter, UpdateProductInput, UpdateVariantInput,
};
use crate::services::CatalogService;
use crate::state::AppState;

/// Query carrying an optional caller identity.
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub telegram_id: Option<TelegramId>,
}

/// Query carrying a required caller identity.
#[derive(Debug, Deserialize)]
pub struct CallerQuery {
    pub telegram_id: TelegramId,
}

/// Query narrowing a size listing to one color.
#[derive(Debug, Deserialize)]
pub struct SizeQuery {
    pub color: Option<String>,
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category within a shop.
#[instrument(skip(state, input))]
pub async fn create_category(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse> {
    let category = CatalogService::new(state.pool())
        .create_category(&shop_code, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List a shop's categories.
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
) -> Result<impl IntoResponse> {
    let categories = CatalogService::new(state.pool())
        .list_categories(&shop_code)
        .await?;
    Ok(Json(categories))
}

// =============================================================================
// Products
// =============================================================================

/// Create a product with its initial variants.
#[instrument(skip(state, input), fields(shop_code = %input.shop_code))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse> {
    let view = CatalogService::new(state.pool())
        .create_product(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// List a shop's products with filters and favorite marks.
#[instrument(skip(state, filter))]
pub async fn list_products(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse> {
    let views = CatalogService::new(state.pool())
        .list_products(&shop_code, &filter)
        .await?;
    Ok(Json(views))
}

/// Fetch one product.
#[instrument(skip(state, viewer))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(viewer): Query<ViewerQuery>,
) -> Result<impl IntoResponse> {
    let view = CatalogService::new(state.pool())
        .get_product(id, viewer.telegram_id.as_ref())
        .await?;
    Ok(Json(view))
}

/// Apply a partial product update.
#[instrument(skip(state, input))]
pub async fn patch_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<impl IntoResponse> {
    let product = CatalogService::new(state.pool())
        .update_product(id, &input)
        .await?;
    Ok(Json(product))
}

/// Delete a product and its variants.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    CatalogService::new(state.pool()).delete_product(id).await?;
    Ok(Json(json!({ "detail": "Product deleted." })))
}

/// Distinct colors a product comes in.
#[instrument(skip(state))]
pub async fn product_colors(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let colors = CatalogService::new(state.pool()).distinct_colors(id).await?;
    Ok(Json(colors))
}

/// Distinct sizes a product comes in, optionally within one color.
#[instrument(skip(state, query))]
pub async fn product_sizes(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<SizeQuery>,
) -> Result<impl IntoResponse> {
    let sizes = CatalogService::new(state.pool())
        .distinct_sizes(id, query.color.as_deref())
        .await?;
    Ok(Json(sizes))
}

// =============================================================================
// Variants
// =============================================================================

/// Add a variant to an existing product.
#[instrument(skip(state, input), fields(product_id = %input.product_id))]
pub async fn create_variant(
    State(state): State<AppState>,
    Json(input): Json<CreateVariantForProductInput>,
) -> Result<impl IntoResponse> {
    let variant = CatalogService::new(state.pool())
        .create_variant(input.product_id, &input.variant)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Apply a partial variant update (pricing rule reruns).
#[instrument(skip(state, input))]
pub async fn patch_variant(
    State(state): State<AppState>,
    Path(id): Path<VariantId>,
    Json(input): Json<UpdateVariantInput>,
) -> Result<impl IntoResponse> {
    let variant = CatalogService::new(state.pool())
        .update_variant(id, &input)
        .await?;
    Ok(Json(variant))
}

/// Delete a variant.
#[instrument(skip(state))]
pub async fn delete_variant(
    State(state): State<AppState>,
    Path(id): Path<VariantId>,
) -> Result<impl IntoResponse> {
    CatalogService::new(state.pool()).delete_variant(id).await?;
    Ok(Json(json!({ "detail": "Variant deleted." })))
}

// =============================================================================
// Favorites
// =============================================================================

/// Bookmark a product for a user.
#[instrument(skip(state, input), fields(telegram_id = %input.telegram_id))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(input): Json<AddFavoriteInput>,
) -> Result<impl IntoResponse> {
    let (_, created) = CatalogService::new(state.pool())
        .add_favorite(&input.telegram_id, input.product_id)
        .await?;

    Ok(if created {
        (
            StatusCode::CREATED,
            Json(json!({ "detail": "Product added to favorites." })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({ "detail": "Product is already in favorites." })),
        )
    })
}

/// List a user's favorited products within one shop.
#[instrument(skip(state, caller))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
    Query(caller): Query<CallerQuery>,
) -> Result<impl IntoResponse> {
    let views = CatalogService::new(state.pool())
        .list_favorites(&shop_code, &caller.telegram_id)
        .await?;
    Ok(Json(views))
}

/// Remove a favorite.
#[instrument(skip(state, caller))]
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<FavoriteId>,
    Query(caller): Query<ViewerQuery>,
) -> Result<impl IntoResponse> {
    let telegram_id = caller
        .telegram_id
        .ok_or_else(|| AppError::BadRequest("telegram_id is required".to_owned()))?;

    CatalogService::new(state.pool())
        .remove_favorite(id, &telegram_id)
        .await?;
    Ok(Json(json!({ "detail": "Product removed from favorites." })))
}
