//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::telegram::{TelegramClient, TelegramNotifier};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the notification gateway.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    notifier: TelegramNotifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Telegram gateway receives its bot token here, from configuration —
    /// nothing reads it from global state later.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let client = TelegramClient::new(config.telegram_bot_token.clone());
        let notifier = TelegramNotifier::new(client);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                notifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the notification dispatcher.
    #[must_use]
    pub fn notifier(&self) -> &TelegramNotifier {
        &self.inner.notifier
    }
}
