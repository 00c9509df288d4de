use super::*;
use crate::commands::{BOT_ADDED_MESSAGE, GREETING};
use async_trait::async_trait;
use hiika_core::{
    language::{Detection, Language},
    traits::{Detector, Translator},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// --- Fakes ---

#[derive(Default)]
struct FakeChannel {
    sent: Mutex<Vec<OutgoingMessage>>,
    deleted: Mutex<Vec<(String, i64)>>,
    fail_send: bool,
    fail_delete: bool,
    /// Messages yielded by `start`, after which the receiver closes.
    inbox: Mutex<Vec<IncomingMessage>>,
}

impl FakeChannel {
    fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    fn deleted(&self) -> Vec<(String, i64)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, HiikaError> {
        let messages: Vec<_> = self.inbox.lock().unwrap().drain(..).collect();
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        for msg in messages {
            tx.send(msg).await.unwrap();
        }
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), HiikaError> {
        if self.fail_send {
            return Err(HiikaError::Channel("send refused".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn delete_message(&self, target: &str, message_id: i64) -> Result<(), HiikaError> {
        if self.fail_delete {
            return Err(HiikaError::Channel(
                "Bad Request: message can't be deleted".into(),
            ));
        }
        self.deleted
            .lock()
            .unwrap()
            .push((target.to_string(), message_id));
        Ok(())
    }

    async fn stop(&self) -> Result<(), HiikaError> {
        Ok(())
    }
}

struct FakeDetector {
    code: Option<&'static str>,
}

#[async_trait]
impl Detector for FakeDetector {
    fn name(&self) -> &str {
        "fake"
    }

    async fn detect(&self, _text: &str) -> Result<Detection, HiikaError> {
        match self.code {
            Some(code) => Ok(Detection::from_code(code)),
            None => Err(HiikaError::Detection("connection reset by peer".into())),
        }
    }
}

#[derive(Default)]
struct FakeTranslator {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Translator for FakeTranslator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, HiikaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HiikaError::Translation("quota exceeded".into()));
        }
        Ok(format!("{text} [{target}]"))
    }
}

// --- Helpers ---

fn text_message(text: &str, message_id: i64) -> IncomingMessage {
    IncomingMessage {
        id: uuid::Uuid::new_v4(),
        channel: "telegram".into(),
        sender_id: "5".into(),
        sender_name: Some("@abebe".into()),
        text: text.into(),
        timestamp: chrono::Utc::now(),
        reply_target: Some("-100123".into()),
        message_id: Some(message_id),
        is_group: true,
        kind: MessageKind::Text,
    }
}

fn gateway(
    channel: Arc<FakeChannel>,
    detected: Option<&'static str>,
    translator: Arc<FakeTranslator>,
    delete_original: bool,
) -> Gateway {
    let router = TranslationRouter::new(Arc::new(FakeDetector { code: detected }), translator);
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
    channels.insert("telegram".into(), channel);
    Gateway::new(Arc::new(router), channels, delete_original)
}

// --- Tests ---

#[tokio::test]
async fn test_translation_is_sent_then_original_deleted() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), Some("am"), translator.clone(), true);

    gw.handle_message(text_message("ሰላም", 77)).await;

    assert_eq!(
        channel.sent_texts(),
        vec!["ሰላም\n\nAfan Oromo\n\n ሰላም [om]\n\nEnglish\n\n ሰላም [en]"]
    );
    assert_eq!(
        channel.sent.lock().unwrap()[0].reply_target.as_deref(),
        Some("-100123")
    );
    assert_eq!(channel.deleted(), vec![("-100123".to_string(), 77)]);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_english_message_sections() {
    let channel = Arc::new(FakeChannel::default());
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    gw.handle_message(text_message("Hello", 1)).await;

    assert_eq!(
        channel.sent_texts(),
        vec!["Hello\n\nAmharic\n\n Hello [am]\n\nAfan Oromo\n\n Hello [om]"]
    );
}

#[tokio::test]
async fn test_unsupported_language_reply() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), Some("fr"), translator.clone(), true);

    gw.handle_message(text_message("Bonjour", 3)).await;

    assert_eq!(channel.sent_texts(), vec!["Unsupported language!"]);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_detection_failure_sends_generic_error_and_keeps_original() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), None, translator.clone(), true);

    gw.handle_message(text_message("Hello", 4)).await;

    let sent = channel.sent_texts();
    assert_eq!(sent, vec![TRANSLATION_ERROR_MESSAGE]);
    assert!(!sent[0].contains("connection reset"));
    assert!(channel.deleted().is_empty());
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);

    // The gateway keeps serving after a failure.
    gw.handle_message(text_message("/start", 5)).await;
    assert_eq!(channel.sent_texts().len(), 2);
}

#[tokio::test]
async fn test_translation_failure_sends_generic_error() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator {
        fail: true,
        ..Default::default()
    });
    let gw = gateway(channel.clone(), Some("om"), translator, true);

    gw.handle_message(text_message("Akkam", 6)).await;

    assert_eq!(channel.sent_texts(), vec![TRANSLATION_ERROR_MESSAGE]);
    assert!(channel.deleted().is_empty());
}

#[tokio::test]
async fn test_delete_failure_does_not_block_reply() {
    let channel = Arc::new(FakeChannel {
        fail_delete: true,
        ..Default::default()
    });
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    gw.handle_message(text_message("Hello", 7)).await;

    assert_eq!(channel.sent_texts().len(), 1);
    assert!(channel.sent_texts()[0].starts_with("Hello\n\nAmharic"));
}

#[tokio::test]
async fn test_delete_disabled() {
    let channel = Arc::new(FakeChannel::default());
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        false,
    );

    gw.handle_message(text_message("Hello", 8)).await;

    assert_eq!(channel.sent_texts().len(), 1);
    assert!(channel.deleted().is_empty());
}

#[tokio::test]
async fn test_failed_send_skips_delete() {
    let channel = Arc::new(FakeChannel {
        fail_send: true,
        ..Default::default()
    });
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    gw.handle_message(text_message("Hello", 9)).await;

    assert!(channel.deleted().is_empty());
}

#[tokio::test]
async fn test_start_command_replies_with_greeting() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), Some("en"), translator.clone(), true);

    gw.handle_message(text_message("/start@hiika_bot", 10)).await;

    assert_eq!(channel.sent_texts(), vec![GREETING]);
    assert!(channel.deleted().is_empty());
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_command_and_blank_text_are_ignored() {
    let channel = Arc::new(FakeChannel::default());
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), Some("en"), translator.clone(), true);

    gw.handle_message(text_message("/settings", 11)).await;
    gw.handle_message(text_message("   \n", 12)).await;

    assert!(channel.sent_texts().is_empty());
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_bot_added_sends_thanks() {
    let channel = Arc::new(FakeChannel::default());
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    let mut event = text_message("", 0);
    event.message_id = None;
    event.kind = MessageKind::BotAdded {
        chat_title: Some("Finfinne".into()),
    };
    gw.handle_message(event).await;

    assert_eq!(channel.sent_texts(), vec![BOT_ADDED_MESSAGE]);
}

#[tokio::test]
async fn test_run_drains_channel_and_returns_when_closed() {
    let channel = Arc::new(FakeChannel {
        inbox: Mutex::new(vec![
            text_message("Hello", 1),
            text_message("/start", 2),
            text_message("Good morning", 3),
        ]),
        ..Default::default()
    });
    let gw = gateway(
        channel.clone(),
        Some("en"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    gw.run().await.unwrap();

    let mut sent = channel.sent_texts();
    sent.sort();
    assert_eq!(sent.len(), 3);
    assert!(sent.contains(&GREETING.to_string()));
    let mut deleted: Vec<i64> = channel.deleted().into_iter().map(|(_, id)| id).collect();
    deleted.sort();
    assert_eq!(deleted, vec![1, 3]);
}

#[tokio::test]
async fn test_private_chat_message_is_translated() {
    let channel = Arc::new(FakeChannel::default());
    let gw = gateway(
        channel.clone(),
        Some("om"),
        Arc::new(FakeTranslator::default()),
        true,
    );

    let mut msg = text_message("Akkam", 13);
    msg.is_group = false;
    msg.reply_target = Some("6".into());
    gw.handle_message(msg).await;

    assert_eq!(
        channel.sent_texts(),
        vec!["Akkam\n\nAmharic\n\n Akkam [am]\n\nEnglish\n\n Akkam [en]"]
    );
    assert_eq!(channel.deleted(), vec![("6".to_string(), 13)]);
}

#[tokio::test]
async fn test_run_handles_many_messages_in_one_session() {
    let inbox: Vec<_> = (1..=50).map(|id| text_message("Hello", id)).collect();
    let channel = Arc::new(FakeChannel {
        inbox: Mutex::new(inbox),
        ..Default::default()
    });
    let translator = Arc::new(FakeTranslator::default());
    let gw = gateway(channel.clone(), Some("en"), translator.clone(), true);

    gw.run().await.unwrap();

    assert_eq!(channel.sent_texts().len(), 50);
    assert_eq!(channel.deleted().len(), 50);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 100);
}
