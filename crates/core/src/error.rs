//! Error types for the pp CLI.
//!
//! This module defines a unified error enum covering configuration loading,
//! prompt validation, command lookup, and the completion service.

use thiserror::Error;

/// Unified error type for the pp CLI.
///
/// All functions in the application return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration file could not be parsed, or settings are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A prompt entry failed load-time validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No command is registered under the requested name
    #[error("Unknown command: '{0}'")]
    CommandNotFound(String),

    /// Network, authentication, or stream failure from the completion service
    #[error("Completion service error: {0}")]
    Completion(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Rule violations found while validating a prompt entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields are absent or empty on an enabled prompt
    #[error("Prompt '{prompt}' requires {} fields", .fields.join(", "))]
    MissingFields {
        prompt: String,
        fields: Vec<&'static str>,
    },

    /// The template uses a placeholder other than the reserved one
    #[error("Prompt '{prompt}': only '{{{allowed}}}' placeholder is allowed, found: '{{{placeholder}}}'")]
    InvalidPlaceholder {
        prompt: String,
        placeholder: String,
        allowed: &'static str,
    },
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
