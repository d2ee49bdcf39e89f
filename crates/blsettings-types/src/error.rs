//! Error types for blade-settings.

use std::io;

use crate::property::InvalidPropertyReason;

/// Errors produced by the blade-settings crates.
#[derive(Debug, thiserror::Error)]
pub enum BlsettingsError {
    #[error("invalid property name: {0}")]
    InvalidProperty(#[from] InvalidPropertyReason),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BlsettingsError>;
