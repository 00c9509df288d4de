//! Configuration: a TOML file with serde defaults, overridden by environment
//! variables for the two secrets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HiikaError;


/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the detectlanguage.com API key.
pub const DETECTION_KEY_ENV: &str = "DETECTLANGUAGE_API_KEY";

/// Top-level Hiika configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hiika: HiikaConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiikaConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file; empty = stdout only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for HiikaConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Chats the bot serves. Empty = all chats.
    #[serde(default)]
    pub allowed_chats: Vec<i64>,
    /// Delete the original message after posting the translation.
    #[serde(default = "default_true")]
    pub delete_original: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            allowed_chats: Vec::new(),
            delete_original: true,
        }
    }
}

/// Language detection service config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_detection_base_url")]
    pub base_url: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_detection_base_url(),
        }
    }
}

/// Translation service config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_base_url")]
    pub base_url: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translation_base_url(),
        }
    }
}

// --- Default value functions ---

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_detection_base_url() -> String {
    "https://ws.detectlanguage.com".to_string()
}
fn default_translation_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

impl Config {
    /// Override secrets from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override secrets using `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.telegram.bot_token = token.trim().to_string();
        }
        if let Some(key) = lookup(DETECTION_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.detection.api_key = key.trim().to_string();
        }
    }

    /// Check that everything `start` needs is present.
    pub fn validate(&self) -> Result<(), HiikaError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(HiikaError::Config(format!(
                "bot token is missing. Set {BOT_TOKEN_ENV} or telegram.bot_token in config.toml"
            )));
        }
        self.validate_detection()
    }

    /// Check that the detection service can be called.
    pub fn validate_detection(&self) -> Result<(), HiikaError> {
        if self.detection.api_key.trim().is_empty() {
            return Err(HiikaError::Config(format!(
                "detection API key is missing. Set {DETECTION_KEY_ENV} or detection.api_key in config.toml"
            )));
        }
        Ok(())
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file was absent; built-in defaults were used.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Nothing is logged here
/// since logging is configured from the result.
pub fn load(path: &str) -> Result<(Config, ConfigSource), HiikaError> {
    let path = Path::new(path);
    if !path.exists() {
        return Ok((Config::default(), ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HiikaError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| HiikaError::Config(format!("failed to parse config: {}", e)))?;

    Ok((config, ConfigSource::File))
}
