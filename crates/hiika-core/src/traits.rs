use crate::{
    error::HiikaError,
    language::{Detection, Language},
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Language detection service.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Human-readable service name.
    fn name(&self) -> &str;

    /// Best-guess language of `text`.
    async fn detect(&self, text: &str) -> Result<Detection, HiikaError>;
}

/// Machine translation service.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable service name.
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target`.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, HiikaError>;
}

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive updates,
/// send replies, and remove messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, HiikaError>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), HiikaError>;

    /// Delete a message. Fails when the bot lacks the rights to do so.
    async fn delete_message(&self, target: &str, message_id: i64) -> Result<(), HiikaError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), HiikaError>;
}
