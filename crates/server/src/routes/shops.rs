//! Shop route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::instrument;

use crate::db::shops::ShopRepository;
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::catalog::{CreateShopInput, ShopCheck, UpdateShopInput};
use crate::state::AppState;

/// List all shops.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let shops = ShopRepository::new(state.pool()).list().await?;
    Ok(Json(shops))
}

/// Register a shop for an existing user.
#[instrument(skip(state, input), fields(shop_code = %input.shop_code))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateShopInput>,
) -> Result<impl IntoResponse> {
    let owner = UserRepository::new(state.pool())
        .find_by_telegram_id(&input.owner_telegram_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let shop = match ShopRepository::new(state.pool()).create(owner.id, &input).await {
        Ok(shop) => shop,
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        Err(e) => return Err(e.into()),
    };

    Ok((StatusCode::CREATED, Json(shop)))
}

/// Fetch one shop by code.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
) -> Result<impl IntoResponse> {
    let shop = ShopRepository::new(state.pool())
        .find_by_code(&shop_code)
        .await?
        .ok_or(AppError::ShopNotFound)?;
    Ok(Json(shop))
}

/// Apply a partial shop update (subscription, activation, wiring).
#[instrument(skip(state, input))]
pub async fn patch(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
    Json(input): Json<UpdateShopInput>,
) -> Result<impl IntoResponse> {
    let shops = ShopRepository::new(state.pool());
    let shop = shops
        .find_by_code(&shop_code)
        .await?
        .ok_or(AppError::ShopNotFound)?;

    let updated = match shops.update(shop.id, &input).await {
        Ok(shop) => shop,
        Err(RepositoryError::NotFound) => return Err(AppError::ShopNotFound),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(updated))
}

/// Availability check: is this shop open for business right now?
#[instrument(skip(state))]
pub async fn check(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
) -> Result<impl IntoResponse> {
    let shop = ShopRepository::new(state.pool())
        .find_by_code(&shop_code)
        .await?
        .ok_or(AppError::ShopNotFound)?;

    if !shop.is_open(Utc::now()) {
        return Err(AppError::InactiveShop);
    }

    Ok(Json(ShopCheck {
        shop_code: shop.shop_code,
        is_active: true,
    }))
}
