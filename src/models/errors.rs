//! # Model Errors
//!
//! Error types for the data model module.

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Data model errors
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Field options could not be decoded into their typed form
    #[error("Failed to decode options for field '{0}'")]
    OptionsDecode(String),
}
