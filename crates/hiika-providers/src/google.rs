//! Google Translate client using the public `translate_a/single` endpoint.

use async_trait::async_trait;
use hiika_core::{error::HiikaError, language::Language, traits::Translator};
use serde_json::Value;
use tracing::debug;

/// Longest text the public endpoint accepts, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Translator backed by Google Translate.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    /// Create from config values.
    pub fn from_config(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["Hello","ሰላም",null,null,10], ...], null, "am", ...]`;
/// each inner array's first element is one translated sentence.
pub(crate) fn extract_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, HiikaError> {
        if source == target {
            return Ok(text.to_string());
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(HiikaError::Translation(format!(
                "text exceeds {MAX_TEXT_CHARS} characters"
            )));
        }

        let url = format!(
            "{}/translate_a/single",
            self.base_url.trim_end_matches('/')
        );
        debug!("google: GET {url} {source}->{target}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| HiikaError::Translation(format!("google request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(HiikaError::Translation(format!(
                "google returned {status}: {body}"
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            HiikaError::Translation(format!("google: failed to parse response: {e}"))
        })?;

        extract_translation(&body).ok_or_else(|| {
            HiikaError::Translation(format!("google returned no translation for {source}->{target}"))
        })
    }
}
