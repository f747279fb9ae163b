//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid host/port: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("AI timeout must be shorter than the request timeout")]
    AiTimeoutExceedsRequest,

    #[error("Invalid AI timeout")]
    InvalidAiTimeout,

    #[error("Fallback AI provider must differ from the primary")]
    FallbackSameAsPrimary,

    #[error("Conversation setting must be greater than zero: {0}")]
    ZeroThreshold(&'static str),
}
