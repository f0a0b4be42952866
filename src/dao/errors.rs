//! # DAO Errors
//!
//! Error types for collection lookup.

use thiserror::Error;

/// Result type for DAO operations
pub type DaoResult<T> = Result<T, DaoError>;

/// Collection lookup errors
#[derive(Debug, Clone, Error)]
pub enum DaoError {
    /// No collection with the given name or id exists
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
}
