//! Field resolver abstraction and the plain-column resolver.

use std::fmt;

use crate::db::{Expression, Params, SelectQuery};
use crate::tools::{inflector, list};

use super::errors::{ResolverError, SearchResult};
use super::multi_match::MultiMatchSubquery;

/// Post-processor applied to the final filter expression of a resolved
/// field (e.g. appending an email visibility guard).
pub type AfterBuildFn = Box<dyn Fn(Expression) -> Expression>;

/// A single successfully resolved field
pub struct ResolverResult {
    /// SQL fragment evaluating to the desired value: a `[[alias.col]]`
    /// marker, `NULL`/`TRUE`/`FALSE`, a `JSON_EXTRACT(...)` call, or a
    /// `{:name}` placeholder
    pub identifier: String,

    /// Parameters bound by the identifier
    pub params: Params,

    /// Optional post-processor wrapping the final expression
    pub after_build: Option<AfterBuildFn>,

    /// Present when the path crossed a multi-valued relation or select
    pub multi_match_subquery: Option<MultiMatchSubquery>,
}

impl ResolverResult {
    /// Create a result with the given identifier and nothing else
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            params: Params::new(),
            after_build: None,
            multi_match_subquery: None,
        }
    }

    /// Create a `NULL` result
    pub fn null() -> Self {
        Self::identifier("NULL")
    }
}

impl fmt::Debug for ResolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverResult")
            .field("identifier", &self.identifier)
            .field("params", &self.params)
            .field("after_build", &self.after_build.is_some())
            .field("multi_match_subquery", &self.multi_match_subquery)
            .finish()
    }
}

/// Translates search fields into SQL and updates the surrounding query
pub trait FieldResolver {
    /// Parses the provided field into a properly formatted db
    /// identifier with its bound parameters
    fn resolve(&mut self, field: &str) -> SearchResult<ResolverResult>;

    /// Conditionally updates the provided query based on the resolved
    /// fields (e.g. attaching accumulated joins)
    fn update_query(&self, query: &mut SelectQuery) -> SearchResult<()>;
}

/// A generic resolver that allows only its listed fields.
///
/// Each allowed entry is either a plain column name or an anchored
/// regular expression (entries starting with `^`). If the list is
/// empty no field filtering is applied.
#[derive(Debug, Clone, Default)]
pub struct SimpleFieldResolver {
    allowed_fields: Vec<String>,
}

impl SimpleFieldResolver {
    /// Create a resolver with the given allowed fields
    pub fn new(allowed_fields: &[&str]) -> Self {
        Self {
            allowed_fields: allowed_fields.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FieldResolver for SimpleFieldResolver {
    fn resolve(&mut self, field: &str) -> SearchResult<ResolverResult> {
        if !list::exist_in_slice_with_regex(field, &self.allowed_fields) {
            return Err(ResolverError::UnresolvableField(field.to_string()));
        }

        Ok(ResolverResult::identifier(format!(
            "[[{}]]",
            inflector::columnify(field)
        )))
    }

    fn update_query(&self, _query: &mut SelectQuery) -> SearchResult<()> {
        Ok(())
    }
}
