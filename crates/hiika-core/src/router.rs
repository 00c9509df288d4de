//! Translation router — detect the source language, translate into the other
//! two, and compose the reply.

use crate::{
    error::HiikaError,
    language::{Detection, Language},
    traits::{Detector, Translator},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Reply text when the detected language is outside the supported set.
pub const UNSUPPORTED_LANGUAGE: &str = "Unsupported language!";

/// A text with its translations into the two other supported languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub original_text: String,
    pub source: Language,
    /// Exactly the two languages other than `source`, in reply order.
    pub translations: Vec<(Language, String)>,
}

/// Result of routing a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationResult {
    Translated(Translation),
    Unsupported { detected: String },
}

impl TranslationResult {
    /// The full reply to post back to the chat.
    ///
    /// ```text
    /// {original}\n\n{Lang A}\n\n {translation A}\n\n{Lang B}\n\n {translation B}
    /// ```
    pub fn display_text(&self) -> String {
        match self {
            Self::Translated(t) => {
                let mut out = t.original_text.clone();
                for (lang, text) in &t.translations {
                    out.push_str(&format!("\n\n{}\n\n {text}", lang.display_name()));
                }
                out
            }
            Self::Unsupported { .. } => UNSUPPORTED_LANGUAGE.to_string(),
        }
    }
}

/// Routes text through a detector and a translator.
///
/// Holds no mutable state; share it across handlers with `Arc`.
pub struct TranslationRouter {
    detector: Arc<dyn Detector>,
    translator: Arc<dyn Translator>,
}

impl TranslationRouter {
    pub fn new(detector: Arc<dyn Detector>, translator: Arc<dyn Translator>) -> Self {
        Self {
            detector,
            translator,
        }
    }

    /// Detect, translate, and compose.
    ///
    /// Any collaborator failure aborts the whole request; no partial result
    /// is ever returned.
    pub async fn route(&self, text: &str) -> Result<TranslationResult, HiikaError> {
        let detection = self.detector.detect(text).await.map_err(as_detection)?;

        let source = match detection {
            Detection::Known(lang) => lang,
            Detection::Unsupported(code) => {
                info!("unsupported language detected: {code:?}");
                return Ok(TranslationResult::Unsupported { detected: code });
            }
        };
        debug!("detected {source} via {}", self.detector.name());

        let mut translations = Vec::with_capacity(2);
        for target in source.targets() {
            debug!("translating {source} -> {target} via {}", self.translator.name());
            let translated = self
                .translator
                .translate(text, source, target)
                .await
                .map_err(as_translation)?;
            translations.push((target, translated));
        }

        Ok(TranslationResult::Translated(Translation {
            original_text: text.to_string(),
            source,
            translations,
        }))
    }
}

fn as_detection(e: HiikaError) -> HiikaError {
    match e {
        HiikaError::Detection(_) => e,
        other => HiikaError::Detection(other.to_string()),
    }
}

fn as_translation(e: HiikaError) -> HiikaError {
    match e {
        HiikaError::Translation(_) => e,
        other => HiikaError::Translation(other.to_string()),
    }
}
