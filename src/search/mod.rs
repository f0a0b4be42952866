//! # Record Search
//!
//! Field resolution for filter and sort expressions: translating
//! dotted, user-supplied field paths into SQL identifiers, bound
//! parameters and the JOINs the surrounding SELECT needs.

pub mod errors;
pub mod join;
pub mod multi_match;
pub mod record_field_resolver;
pub mod resolver;

pub use errors::{ResolverError, SearchResult};
pub use join::Join;
pub use multi_match::MultiMatchSubquery;
pub use record_field_resolver::RecordFieldResolver;
pub use resolver::{AfterBuildFn, FieldResolver, ResolverResult, SimpleFieldResolver};
