//! The three languages the relay works with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "am")]
    Amharic,
    #[serde(rename = "om")]
    AfanOromo,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 3] = [Self::Amharic, Self::AfanOromo, Self::English];

    /// ISO 639-1 code, as used by both the detection and translation services.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Amharic => "am",
            Self::AfanOromo => "om",
            Self::English => "en",
        }
    }

    /// Section heading used in composed replies.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Amharic => "Amharic",
            Self::AfanOromo => "Afan Oromo",
            Self::English => "English",
        }
    }

    /// Parse an ISO code. Case-insensitive; a regional suffix (`en-US`) is ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "am" => Some(Self::Amharic),
            "om" => Some(Self::AfanOromo),
            "en" => Some(Self::English),
            _ => None,
        }
    }

    /// The two other languages, in the order their sections appear in a reply.
    pub fn targets(&self) -> [Language; 2] {
        match self {
            Self::Amharic => [Self::AfanOromo, Self::English],
            Self::AfanOromo => [Self::Amharic, Self::English],
            Self::English => [Self::Amharic, Self::AfanOromo],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of language detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Known(Language),
    /// Anything outside the supported set; holds the raw code for logging.
    Unsupported(String),
}

impl Detection {
    pub fn from_code(code: &str) -> Self {
        match Language::from_code(code) {
            Some(lang) => Self::Known(lang),
            None => Self::Unsupported(code.to_string()),
        }
    }
}
