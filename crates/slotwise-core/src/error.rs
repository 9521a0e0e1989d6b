//! Core error types for slotwise-core.
//!
//! Zero-signal inputs (empty memo, no history, no candidates) are not errors.
//! Only caller-contract violations, unreadable requests and configuration
//! failures surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slotwise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Caller supplied invalid input
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors, returned directly by [`crate::EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be resolved or created
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Caller-contract violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A timestamp that cannot be read as ISO-8601 with an offset
    #[error("Invalid timestamp for '{field}': {value:?} ({reason})")]
    InvalidTimestamp {
        field: String,
        value: String,
        reason: String,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidTimestamp { field, .. }
            | ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
