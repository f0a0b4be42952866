//! # SQL Expression and Query Building
//!
//! The small query-builder seam the record-search subsystem emits
//! into: composable WHERE/ON expressions with bound parameters, and a
//! SELECT query that joins and filters can be attached to.
//!
//! Built SQL keeps `[[alias.column]]` identifier markers intact;
//! substituting them with engine-specific quoting is the executing
//! layer's concern.

pub mod expression;
pub mod query;

pub use expression::{Expression, Params};
pub use query::{BuiltQuery, JoinClause, SelectQuery};
