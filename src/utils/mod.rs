//! Configuration utilities.

/// `ragbot.toml` loading, defaults and validation.
pub mod config;

pub use config::{ConfigError, RagbotConfig};
