//! Error types for tanklog

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid clock time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown {kind}: {key}")]
    UnknownReference { kind: &'static str, key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
