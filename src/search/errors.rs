//! # Search Errors
//!
//! Error types for field resolution. Resolution errors are never
//! recovered internally; callers treat them as filter compile errors
//! and surface them verbatim.

use thiserror::Error;

use crate::models::ModelError;

/// Result type for search operations
pub type SearchResult<T> = Result<T, ResolverError>;

/// Field resolution errors
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// The path matches none of the whitelisted field formats
    #[error("Failed to resolve field '{0}'")]
    UnresolvableField(String),

    /// Structurally malformed `@collection`/`@request` path
    #[error("Invalid field path '{0}'")]
    InvalidPath(String),

    /// Collection name or id lookup failed
    #[error("Failed to load collection '{0}'")]
    UnknownCollection(String),

    /// Path segment not found in the current collection schema
    #[error("Unrecognized field '{0}'")]
    UnknownField(String),

    /// An intermediate segment references a field that cannot be
    /// traversed further
    #[error("Field '{0}' is not a valid relation")]
    NotARelation(String),

    /// Relation/select options could not be interpreted
    #[error("Failed to initialize field '{0}' options")]
    OptionsInitFailed(String),
}

impl From<ModelError> for ResolverError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::OptionsDecode(field) => ResolverError::OptionsInitFailed(field),
        }
    }
}
