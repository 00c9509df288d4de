use thiserror::Error;

/// Top-level error type for Hiika.
#[derive(Debug, Error)]
pub enum HiikaError {
    /// The language-detection service failed.
    #[error("detection error: {0}")]
    Detection(String),

    /// The translation service failed.
    #[error("translation error: {0}")]
    Translation(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HiikaError {
    /// Short label for logs (`"detection"`, `"translation"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Detection(_) => "detection",
            Self::Translation(_) => "translation",
            Self::Channel(_) => "channel",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
