//! Telegram Bot API channel.
//!
//! Uses long polling via `getUpdates`, `sendMessage` for replies, and
//! `deleteMessage` to remove originals once they have been translated.
//! Docs: <https://core.telegram.org/bots/api>

mod polling;
pub(crate) mod send;
pub(crate) mod types;


use hiika_core::{config::TelegramConfig, error::HiikaError};
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram channel using the Bot API with long polling.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
    base_url: String,
    /// Tracks the last update_id to avoid reprocessing.
    last_update_id: Arc<Mutex<Option<i64>>>,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_url(config, DEFAULT_API_URL)
    }

    /// Create a channel talking to a custom Bot API server.
    pub fn with_api_url(config: TelegramConfig, api_url: &str) -> Self {
        let base_url = format!(
            "{}/bot{}",
            api_url.trim_end_matches('/'),
            config.bot_token
        );
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }
}

/// Parse a chat id from a `reply_target` string.
pub(crate) fn parse_chat_id(target: &str) -> Result<i64, HiikaError> {
    target
        .parse()
        .map_err(|e| HiikaError::Channel(format!("invalid telegram chat_id '{target}': {e}")))
}
