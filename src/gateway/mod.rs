//! Gateway — the event loop connecting channels to the translation router.
//!
//! Each incoming message is handled in its own task. Translation failures
//! never reach the chat as raw errors, and deleting the original is
//! best-effort.

#[cfg(test)]
mod tests;

use crate::commands::{self, Command};
use hiika_core::{
    error::HiikaError,
    message::{IncomingMessage, MessageKind, OutgoingMessage},
    router::TranslationRouter,
    traits::Channel,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Reply sent when detection or translation fails.
pub const TRANSLATION_ERROR_MESSAGE: &str = "An error occurred while translating.";

/// The central gateway that routes messages between channels and the router.
#[derive(Clone)]
pub struct Gateway {
    router: Arc<TranslationRouter>,
    channels: HashMap<String, Arc<dyn Channel>>,
    delete_original: bool,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        router: Arc<TranslationRouter>,
        channels: HashMap<String, Arc<dyn Channel>>,
        delete_original: bool,
    ) -> Self {
        Self {
            router,
            channels,
            delete_original,
        }
    }

    /// Run the main event loop until Ctrl-C or until every channel closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!(
            "Hiika gateway running | channels: {} | delete original: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.delete_original
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        let mut handlers = JoinSet::new();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(incoming) = msg else {
                        info!("all channels closed");
                        break;
                    };
                    let gw = self.clone();
                    handlers.spawn(async move { gw.handle_message(incoming).await });
                }
                Some(res) = handlers.join_next(), if !handlers.is_empty() => {
                    if let Err(e) = res {
                        error!("message handler panicked: {e}");
                    }
                }
                _ = &mut ctrl_c => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(handlers).await;
        Ok(())
    }

    /// Let in-flight handlers finish, then stop every channel.
    async fn shutdown(&self, mut handlers: JoinSet<()>) {
        info!("Shutting down...");

        while let Some(res) = handlers.join_next().await {
            if let Err(e) = res {
                error!("message handler panicked: {e}");
            }
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!("Shutdown complete.");
    }

    /// Dispatch a single incoming message.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        match incoming.kind {
            MessageKind::BotAdded { ref chat_title } => {
                info!(
                    "Bot added to group/channel: {} (ID: {})",
                    chat_title.as_deref().unwrap_or("untitled"),
                    incoming.reply_target.as_deref().unwrap_or("unknown")
                );
                self.send_text(&incoming, commands::BOT_ADDED_MESSAGE).await;
            }
            MessageKind::Text => {
                let text = incoming.text.trim();
                if text.is_empty() {
                    debug!("ignoring blank message from {}", incoming.sender_id);
                    return;
                }

                if let Some(cmd) = Command::parse(text) {
                    self.send_text(&incoming, &cmd.reply()).await;
                    return;
                }

                if text.starts_with('/') {
                    debug!("ignoring unknown command from {}", incoming.sender_id);
                    return;
                }

                self.translate_and_reply(&incoming).await;
            }
        }
    }

    async fn translate_and_reply(&self, incoming: &IncomingMessage) {
        let preview: String = incoming.text.chars().take(60).collect();
        info!(
            "[{}{}] {} says: {}{}",
            incoming.channel,
            if incoming.is_group { " group" } else { "" },
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview,
            if incoming.text.chars().count() > 60 {
                "..."
            } else {
                ""
            }
        );

        let result = match self.router.route(&incoming.text).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "{} failed for message from {}: {e}",
                    e.kind(),
                    incoming.sender_id
                );
                self.send_text(incoming, TRANSLATION_ERROR_MESSAGE).await;
                return;
            }
        };

        if !self.send_text(incoming, &result.display_text()).await {
            return;
        }

        if self.delete_original {
            if let Err(e) = self.delete_original_message(incoming).await {
                warn!("could not delete original message: {e}");
            }
        }
    }

    /// Remove the message that was just translated.
    async fn delete_original_message(&self, incoming: &IncomingMessage) -> Result<(), HiikaError> {
        let (Some(target), Some(message_id)) =
            (incoming.reply_target.as_deref(), incoming.message_id)
        else {
            return Err(HiikaError::Channel(
                "message has no chat or message id".into(),
            ));
        };

        let channel = self
            .channels
            .get(&incoming.channel)
            .ok_or_else(|| HiikaError::Channel(format!("unknown channel {}", incoming.channel)))?;

        channel.delete_message(target, message_id).await
    }

    /// Send plain text back to the originating chat. Returns whether it was sent.
    async fn send_text(&self, incoming: &IncomingMessage, text: &str) -> bool {
        let Some(channel) = self.channels.get(&incoming.channel) else {
            error!("no channel named {} to reply on", incoming.channel);
            return false;
        };

        match channel.send(OutgoingMessage::reply_to(incoming, text)).await {
            Ok(()) => true,
            Err(e) => {
                error!("failed to send message: {e}");
                false
            }
        }
    }
}
