//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use bazaar_core::{AddressId, TelegramId};

use crate::error::Result;
use crate::models::user::{RegisterUserInput, SetActiveShopInput, UpdateUserInput};
use crate::services::UserService;
use crate::services::users::RegistrationOutcome;
use crate::state::AppState;

/// Register a user (or acknowledge an existing registration).
#[instrument(skip(state, input))]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserInput>,
) -> Result<impl IntoResponse> {
    let outcome = UserService::new(state.pool()).register(&input).await?;

    Ok(match outcome {
        RegistrationOutcome::Registered => (
            StatusCode::CREATED,
            Json(json!({ "detail": "User registered successfully." })),
        ),
        RegistrationOutcome::AlreadyRegistered => (
            StatusCode::OK,
            Json(json!({ "detail": "User with this telegram_id already exists." })),
        ),
    })
}

/// Fetch a user's profile with addresses.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(telegram_id): Path<TelegramId>,
) -> Result<impl IntoResponse> {
    let view = UserService::new(state.pool())
        .get_profile(&telegram_id)
        .await?;
    Ok(Json(view))
}

/// Apply a partial profile update; new addresses are appended.
#[instrument(skip(state, input))]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(telegram_id): Path<TelegramId>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse> {
    let view = UserService::new(state.pool())
        .update_profile(&telegram_id, &input)
        .await?;
    Ok(Json(view))
}

/// Delete a saved address.
#[instrument(skip(state))]
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<impl IntoResponse> {
    UserService::new(state.pool()).delete_address(id).await?;
    Ok(Json(json!({ "detail": "Address deleted." })))
}

/// Point the user at the shop they are browsing.
#[instrument(skip(state, input))]
pub async fn set_active_shop(
    State(state): State<AppState>,
    Json(input): Json<SetActiveShopInput>,
) -> Result<impl IntoResponse> {
    UserService::new(state.pool()).set_active_shop(&input).await?;
    Ok(Json(json!({ "detail": "Active shop updated." })))
}
