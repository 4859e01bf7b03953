//! Order route handlers.
//!
//! Handlers dispatch the notification payloads their service calls return —
//! strictly after the transaction has committed, and without letting
//! delivery failures affect the response.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use bazaar_core::OrderId;

use super::products::CallerQuery;
use crate::error::Result;
use crate::models::order::{CreateOrderInput, UpdateStatusInput, status_directory};
use crate::services::OrderService;
use crate::state::AppState;

/// Assemble an order from basket lines or explicit pairs.
#[instrument(skip(state, input), fields(telegram_id = %input.telegram_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let (response, payloads) = OrderService::new(state.pool()).create_order(&input).await?;

    // Best-effort, post-commit: failures are logged inside the notifier.
    state.notifier().dispatch(&payloads).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// A user's orders within their active shop.
#[instrument(skip(state, caller))]
pub async fn list_mine(
    State(state): State<AppState>,
    Query(caller): Query<CallerQuery>,
) -> Result<impl IntoResponse> {
    let views = OrderService::new(state.pool())
        .list_for_user(&caller.telegram_id)
        .await?;
    Ok(Json(views))
}

/// One order, visible only to its owner.
#[instrument(skip(state, caller))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Query(caller): Query<CallerQuery>,
) -> Result<impl IntoResponse> {
    let view = OrderService::new(state.pool())
        .get_for_user(id, &caller.telegram_id)
        .await?;
    Ok(Json(view))
}

/// All orders placed against a shop, with the localized status directory.
#[instrument(skip(state))]
pub async fn list_for_shop(
    State(state): State<AppState>,
    Path(shop_code): Path<String>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool())
        .list_for_shop(&shop_code)
        .await?;
    Ok(Json(json!({
        "orders": orders,
        "statuses": status_directory(),
    })))
}

/// The localized status directory on its own.
#[instrument]
pub async fn statuses() -> impl IntoResponse {
    Json(status_directory())
}

/// Move an order to a new status.
#[instrument(skip(state, input))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<impl IntoResponse> {
    let (_, payload) = OrderService::new(state.pool())
        .update_status(id, &input.status)
        .await?;

    // Only an actual change produces a payload; re-asserting the current
    // status must not re-notify.
    if let Some(payload) = payload {
        state.notifier().dispatch(std::slice::from_ref(&payload)).await;
    }

    Ok(Json(json!({ "detail": "Order status updated." })))
}
