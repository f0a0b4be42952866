//! Multi-match subquery descriptors.

use crate::db::Params;

use super::join::Join;

/// A parallel join chain mirroring the main resolution walk, rooted
/// under a fresh alias of the base table.
///
/// When a path crosses a multi-valued relation or select, per-row
/// semantics of comparisons on the outer record become ambiguous. The
/// filter expression builder uses this descriptor to realize ANY/ALL
/// style comparisons; the resolver only assembles it and never renders
/// the subquery SQL itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchSubquery {
    /// Alias of the base table in the outer query
    pub base_table_alias: String,

    /// Table the subquery selects from (the base table)
    pub from_table: String,

    /// Fresh alias of the base table inside the subquery
    pub from_alias: String,

    /// Mirrored joins in registration order
    pub joins: Vec<Join>,

    /// Parameters bound by the mirrored joins
    pub params: Params,

    /// Identifier of the compared value inside the subquery
    pub value_identifier: String,
}

impl MultiMatchSubquery {
    /// Create an empty descriptor rooted at the given base alias
    pub fn new(base_table_alias: impl Into<String>, from_table: impl Into<String>) -> Self {
        let base_table_alias = base_table_alias.into();
        let from_alias = format!("__mm_{}", base_table_alias);
        Self {
            base_table_alias,
            from_table: from_table.into(),
            from_alias,
            joins: Vec::new(),
            params: Params::new(),
            value_identifier: String::new(),
        }
    }
}
