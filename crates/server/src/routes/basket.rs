//! Basket route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use bazaar_core::BasketLineId;

use super::products::CallerQuery;
use crate::error::Result;
use crate::models::basket::{StepBasketInput, UpsertBasketInput};
use crate::services::BasketService;
use crate::state::AppState;

/// Set a basket line's quantity (replace semantics; 0 removes).
#[instrument(skip(state, input), fields(telegram_id = %input.telegram_id))]
pub async fn upsert(
    State(state): State<AppState>,
    Json(input): Json<UpsertBasketInput>,
) -> Result<impl IntoResponse> {
    let mutation = BasketService::new(state.pool()).upsert_line(&input).await?;
    Ok(Json(mutation))
}

/// Bump a basket line by one in either direction.
#[instrument(skip(state, input), fields(telegram_id = %input.telegram_id))]
pub async fn step(
    State(state): State<AppState>,
    Json(input): Json<StepBasketInput>,
) -> Result<impl IntoResponse> {
    let mutation = BasketService::new(state.pool()).step_line(&input).await?;
    Ok(Json(mutation))
}

/// List a user's basket within one shop.
#[instrument(skip(state, caller))]
pub async fn list(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
    Query(caller): Query<CallerQuery>,
) -> Result<impl IntoResponse> {
    let lines = BasketService::new(state.pool())
        .list_lines(&shop_code, &caller.telegram_id)
        .await?;
    Ok(Json(lines))
}

/// Delete a basket line.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<BasketLineId>,
) -> Result<impl IntoResponse> {
    BasketService::new(state.pool()).delete_line(id).await?;
    Ok(Json(json!({ "detail": "Basket line deleted." })))
}
