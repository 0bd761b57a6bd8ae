//! Common error types for the annotator

use thiserror::Error;

/// Common result type for annotator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the HTTP service
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session operation not allowed in the current state
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
