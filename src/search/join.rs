//! Join records accumulated during field resolution.

use crate::db::Expression;

/// A pending LEFT JOIN for the outer SELECT or a multi-match mirror.
///
/// Aliases are unique within a resolver; registering a second join
/// with the same alias replaces the earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Table name or table expression (e.g. a `json_each(...)` call)
    pub table: String,

    /// Join alias
    pub alias: String,

    /// Optional join condition
    pub on: Option<Expression>,
}

impl Join {
    /// Create a join without a condition
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            on: None,
        }
    }

    /// Create a join with a condition
    pub fn with_on(
        table: impl Into<String>,
        alias: impl Into<String>,
        on: Expression,
    ) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            on: Some(on),
        }
    }
}
