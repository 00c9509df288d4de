//! # hiika-core
//!
//! Core types, traits, configuration, and error handling for the Hiika
//! translation relay, plus the language router that ties detection and
//! translation together.

pub mod config;
pub mod error;
pub mod language;
pub mod message;
pub mod router;
pub mod traits;
