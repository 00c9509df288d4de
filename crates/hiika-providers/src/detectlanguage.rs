//! detectlanguage.com client.
//!
//! Docs: <https://detectlanguage.com/documentation>

use async_trait::async_trait;
use hiika_core::{error::HiikaError, language::Detection, traits::Detector};
use serde::Deserialize;
use tracing::debug;

/// Detector backed by the detectlanguage.com v0.2 API.
pub struct DetectLanguageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DetectLanguageClient {
    /// Create from config values.
    pub fn from_config(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Whether an API key is set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectResponse {
    pub data: Option<DetectData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectData {
    #[serde(default)]
    pub detections: Vec<DetectionItem>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct DetectionItem {
    pub language: String,
    #[serde(default, rename = "isReliable")]
    pub is_reliable: bool,
    #[serde(default)]
    pub confidence: f64,
}

/// Language code of the top detection, if any.
pub(crate) fn top_language(resp: &DetectResponse) -> Option<&str> {
    resp.data
        .as_ref()
        .and_then(|d| d.detections.first())
        .map(|d| d.language.as_str())
        .filter(|l| !l.is_empty())
}

#[async_trait]
impl Detector for DetectLanguageClient {
    fn name(&self) -> &str {
        "detectlanguage"
    }

    async fn detect(&self, text: &str) -> Result<Detection, HiikaError> {
        if !self.is_configured() {
            return Err(HiikaError::Detection("no API key configured".into()));
        }

        let url = format!("{}/0.2/detect", self.base_url.trim_end_matches('/'));
        debug!("detectlanguage: POST {url} ({} bytes)", text.len());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| HiikaError::Detection(format!("detectlanguage request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(HiikaError::Detection(format!(
                "detectlanguage returned {status}: {body}"
            )));
        }

        let parsed: DetectResponse = resp.json().await.map_err(|e| {
            HiikaError::Detection(format!("detectlanguage: failed to parse response: {e}"))
        })?;

        let code = top_language(&parsed)
            .ok_or_else(|| HiikaError::Detection("detectlanguage returned no detections".into()))?;

        Ok(Detection::from_code(code))
    }
}
