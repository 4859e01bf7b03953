//! Telegram integration: the notification gateway.
//!
//! This module provides:
//! - [`TelegramClient`] for calling the Bot API
//! - Message builders rendering notification payloads into HTML
//! - [`TelegramNotifier`] for best-effort dispatch
//!
//! # Flow
//!
//! 1. A core operation (order assembly, status update) returns structured
//!    [`NotificationPayload`](crate::models::notification::NotificationPayload)
//!    values alongside its result
//! 2. The route handler dispatches them through [`TelegramNotifier`] after
//!    the transaction has committed
//! 3. Delivery failures are logged and never propagate to the caller

mod client;
mod error;
mod messages;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use messages::render;
pub use types::{InlineKeyboardButton, ReplyMarkup, SendMessageRequest, SendMessageResponse};

use tracing::instrument;

use crate::models::notification::NotificationPayload;

/// Best-effort dispatcher for notification payloads.
///
/// Failure to notify never fails the operation that produced the payload:
/// errors are logged and swallowed here.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: TelegramClient,
}

impl TelegramNotifier {
    /// Wrap a client.
    #[must_use]
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    /// Send every payload, logging failures.
    #[instrument(skip_all, fields(count = payloads.len()))]
    pub async fn dispatch(&self, payloads: &[NotificationPayload]) {
        for payload in payloads {
            let request = messages::render(payload);
            if let Err(e) = self.client.send_message(&request).await {
                tracing::warn!(
                    order_id = %payload.order_id(),
                    chat_id = %payload.chat_id(),
                    error = %e,
                    "Failed to deliver Telegram notification"
                );
            }
        }
    }
}
