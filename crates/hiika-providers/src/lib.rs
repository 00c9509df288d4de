//! # hiika-providers
//!
//! Clients for the external services Hiika depends on: language detection
//! (detectlanguage.com) and machine translation (Google Translate).

pub mod detectlanguage;
pub mod google;

pub use detectlanguage::DetectLanguageClient;
pub use google::GoogleTranslator;
