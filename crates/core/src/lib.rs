//! pp Core Library
//!
//! Foundational utilities shared by every pp crate:
//! - Error handling (`AppError`, `ValidationError`, `AppResult`)
//! - Logging infrastructure
//! - Application settings

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult, ValidationError};
