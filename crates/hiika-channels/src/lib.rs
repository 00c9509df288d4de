//! # hiika-channels
//!
//! Messaging platform integrations for Hiika.

pub mod telegram;
pub mod utils;
