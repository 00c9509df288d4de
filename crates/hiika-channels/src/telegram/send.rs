//! Outbound calls: text messages, message deletion, and command registration.
//!
//! Request URLs embed the bot token, so reqwest errors are always stripped
//! of their URL before they are formatted.

use super::types::TgResponse;
use super::TelegramChannel;
use crate::utils::split_message;
use hiika_core::error::HiikaError;
use tracing::{info, warn};

/// Telegram's per-message text limit.
pub(crate) const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a plain-text message to a specific chat, splitting it if needed.
    ///
    /// No parse mode is set: user text is echoed back verbatim and must not
    /// be interpreted as Markdown.
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), HiikaError> {
        let url = format!("{}/sendMessage", self.base_url);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    HiikaError::Channel(format!("telegram send failed: {}", e.without_url()))
                })?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(HiikaError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Delete a message. Telegram answers `ok: false` when the bot is not
    /// allowed to, e.g. in groups where it is not an admin.
    pub(crate) async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), HiikaError> {
        let url = format!("{}/deleteMessage", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                HiikaError::Channel(format!("telegram deleteMessage failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        let parsed: TgResponse<bool> = resp.json().await.map_err(|e| {
            HiikaError::Channel(format!(
                "telegram deleteMessage parse failed ({status}): {}",
                e.without_url()
            ))
        })?;

        if !parsed.ok || parsed.result != Some(true) {
            return Err(HiikaError::Channel(format!(
                "telegram deleteMessage rejected ({status}): {}",
                parsed.description.unwrap_or_default()
            )));
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "What this bot does" },
                { "command": "help", "description": "Supported languages" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!(
                    "failed to register Telegram bot commands: {}",
                    e.without_url()
                );
            }
        }
    }
}
