//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate};
use super::{parse_chat_id, TelegramChannel};
use async_trait::async_trait;
use hiika_core::{
    error::HiikaError,
    message::{IncomingMessage, MessageKind, OutgoingMessage},
    traits::Channel,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Update types requested from `getUpdates`.
const ALLOWED_UPDATES: &str = r#"["message","channel_post","my_chat_member"]"#;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, HiikaError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_chats = self.config.allowed_chats.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut query = vec![
                    ("timeout", "30".to_string()),
                    ("allowed_updates", ALLOWED_UPDATES.to_string()),
                ];
                if let Some(off) = offset {
                    query.push(("offset", off.to_string()));
                }

                let resp = match client
                    .get(format!("{base_url}/getUpdates"))
                    .query(&query)
                    .timeout(Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!(
                            "telegram poll error (retry in {backoff_secs}s): {}",
                            e.without_url()
                        );
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!(
                            "telegram parse error (retry in {backoff_secs}s): {}",
                            e.without_url()
                        );
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(incoming) = to_incoming(update, &allowed_chats) else {
                        continue;
                    };

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), HiikaError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| HiikaError::Channel("no reply_target on outgoing message".into()))?;

        let chat_id = parse_chat_id(chat_id_str)?;
        self.send_text(chat_id, &message.text).await
    }

    async fn delete_message(&self, target: &str, message_id: i64) -> Result<(), HiikaError> {
        let chat_id = parse_chat_id(target)?;
        self.delete(chat_id, message_id).await
    }

    async fn stop(&self) -> Result<(), HiikaError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Convert a raw update into an incoming message.
///
/// Returns `None` for updates the gateway has no use for: non-text messages,
/// chats outside `allowed_chats`, and membership changes other than the bot
/// being added.
pub(crate) fn to_incoming(update: TgUpdate, allowed_chats: &[i64]) -> Option<IncomingMessage> {
    let chat_allowed = |id: i64| allowed_chats.is_empty() || allowed_chats.contains(&id);

    if let Some(member) = update.my_chat_member {
        if !member.is_bot_added() {
            debug!(
                "ignoring membership change in {}: {} -> {}",
                member.chat.id, member.old_chat_member.status, member.new_chat_member.status
            );
            return None;
        }
        if !chat_allowed(member.chat.id) {
            warn!("bot added to chat {} outside allowed_chats", member.chat.id);
            return None;
        }
        return Some(IncomingMessage {
            id: Uuid::new_v4(),
            channel: "telegram".to_string(),
            sender_id: member.from.id.to_string(),
            sender_name: Some(member.from.display_name()),
            text: String::new(),
            timestamp: chrono::Utc::now(),
            reply_target: Some(member.chat.id.to_string()),
            message_id: None,
            is_group: member.chat.is_group(),
            kind: MessageKind::BotAdded {
                chat_title: member.chat.title,
            },
        });
    }

    let msg = update.message.or(update.channel_post)?;
    let text = msg.text?;

    if !chat_allowed(msg.chat.id) {
        warn!("ignoring message from chat {} outside allowed_chats", msg.chat.id);
        return None;
    }

    // Anonymous admins and channels post on behalf of a chat (`sender_chat`),
    // with `from` set to a placeholder bot; attribute those to the chat.
    let (sender_id, sender_name) = match (&msg.sender_chat, &msg.from) {
        (Some(chat), _) => (chat.id.to_string(), chat.title.clone()),
        (None, Some(user)) => (user.id.to_string(), Some(user.display_name())),
        (None, None) => (msg.chat.id.to_string(), msg.chat.title.clone()),
    };

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id,
        sender_name,
        text,
        timestamp: chrono::Utc::now(),
        reply_target: Some(msg.chat.id.to_string()),
        message_id: Some(msg.message_id),
        is_group: msg.chat.is_group(),
        kind: MessageKind::Text,
    })
}
