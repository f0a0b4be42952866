//! Composable SQL condition expressions.

use std::collections::HashMap;

use serde_json::Value;

/// Bound query parameters keyed by placeholder name
pub type Params = HashMap<String, Value>;

/// A SQL condition fragment.
///
/// Column operands render as `[[column]]` markers; values always bind
/// through `{:name}` placeholders, never inline.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A raw SQL fragment with explicitly named parameters
    Raw {
        /// The SQL text
        sql: String,
        /// Named parameters referenced by the fragment
        params: Params,
    },

    /// Column/value equality pairs joined with `AND`
    Hash {
        /// `(column, value)` pairs
        pairs: Vec<(String, Value)>,
    },

    /// Column membership in a value list
    In {
        /// The column operand
        column: String,
        /// The candidate values
        values: Vec<Value>,
    },

    /// Conjunction of sub-expressions
    And(Vec<Expression>),

    /// Disjunction of sub-expressions
    Or(Vec<Expression>),
}

impl Expression {
    /// Create a raw expression without parameters
    pub fn new(sql: impl Into<String>) -> Self {
        Expression::Raw {
            sql: sql.into(),
            params: Params::new(),
        }
    }

    /// Create a raw expression with named parameters
    pub fn with_params(sql: impl Into<String>, params: Params) -> Self {
        Expression::Raw {
            sql: sql.into(),
            params,
        }
    }

    /// Create a single-pair equality expression
    pub fn hash(column: impl Into<String>, value: Value) -> Self {
        Expression::Hash {
            pairs: vec![(column.into(), value)],
        }
    }

    /// Create a membership expression
    pub fn in_values(column: impl Into<String>, values: Vec<Value>) -> Self {
        Expression::In {
            column: column.into(),
            values,
        }
    }

    /// Combine expressions with `AND`
    pub fn and(exprs: Vec<Expression>) -> Self {
        Expression::And(exprs)
    }

    /// Combine expressions with `OR`
    pub fn or(exprs: Vec<Expression>) -> Self {
        Expression::Or(exprs)
    }

    /// Renders the expression, collecting named parameters into
    /// `params` and assigning `p{N}` placeholders from `counter` for
    /// hash and membership values.
    pub fn build(&self, params: &mut Params, counter: &mut usize) -> String {
        match self {
            Expression::Raw { sql, params: own } => {
                for (name, value) in own {
                    params.insert(name.clone(), value.clone());
                }
                sql.clone()
            }
            Expression::Hash { pairs } => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(column, value)| {
                        let name = next_placeholder(counter);
                        params.insert(name.clone(), value.clone());
                        format!("[[{}]] = {{:{}}}", column, name)
                    })
                    .collect();

                match parts.len() {
                    0 => String::new(),
                    1 => parts.into_iter().next().unwrap_or_default(),
                    _ => format!("({})", parts.join(" AND ")),
                }
            }
            Expression::In { column, values } => {
                if values.is_empty() {
                    return "0=1".into();
                }

                if values.len() == 1 {
                    let name = next_placeholder(counter);
                    params.insert(name.clone(), values[0].clone());
                    return format!("[[{}]] = {{:{}}}", column, name);
                }

                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| {
                        let name = next_placeholder(counter);
                        params.insert(name.clone(), value.clone());
                        format!("{{:{}}}", name)
                    })
                    .collect();

                format!("[[{}]] IN ({})", column, placeholders.join(", "))
            }
            Expression::And(exprs) => join_exprs(exprs, " AND ", params, counter),
            Expression::Or(exprs) => join_exprs(exprs, " OR ", params, counter),
        }
    }
}

fn join_exprs(
    exprs: &[Expression],
    separator: &str,
    params: &mut Params,
    counter: &mut usize,
) -> String {
    let parts: Vec<String> = exprs
        .iter()
        .map(|e| e.build(params, counter))
        .filter(|s| !s.is_empty())
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => {
            let wrapped: Vec<String> = parts.into_iter().map(|p| format!("({})", p)).collect();
            format!("({})", wrapped.join(separator))
        }
    }
}

fn next_placeholder(counter: &mut usize) -> String {
    let name = format!("p{}", counter);
    *counter += 1;
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(expr: &Expression) -> (String, Params) {
        let mut params = Params::new();
        let mut counter = 0;
        let sql = expr.build(&mut params, &mut counter);
        (sql, params)
    }

    #[test]
    fn test_raw_expression() {
        let expr = Expression::new("[[demo.title]] > 1");
        let (sql, params) = build(&expr);

        assert_eq!(sql, "[[demo.title]] > 1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_raw_expression_with_params() {
        let mut own = Params::new();
        own.insert("fABCDE".into(), json!("get"));
        let expr = Expression::with_params("{:fABCDE}", own);

        let (sql, params) = build(&expr);
        assert_eq!(sql, "{:fABCDE}");
        assert_eq!(params["fABCDE"], json!("get"));
    }

    #[test]
    fn test_hash_expression() {
        let expr = Expression::hash("__auth_users.id", json!("abc"));
        let (sql, params) = build(&expr);

        assert_eq!(sql, "[[__auth_users.id]] = {:p0}");
        assert_eq!(params["p0"], json!("abc"));
    }

    #[test]
    fn test_in_single_value() {
        let expr = Expression::in_values("__data_demo1.id", vec![json!("test")]);
        let (sql, params) = build(&expr);

        assert_eq!(sql, "[[__data_demo1.id]] = {:p0}");
        assert_eq!(params["p0"], json!("test"));
    }

    #[test]
    fn test_in_multiple_values() {
        let expr = Expression::in_values("__data_users.id", vec![json!("a"), json!("b")]);
        let (sql, params) = build(&expr);

        assert_eq!(sql, "[[__data_users.id]] IN ({:p0}, {:p1})");
        assert_eq!(params["p0"], json!("a"));
        assert_eq!(params["p1"], json!("b"));
    }

    #[test]
    fn test_in_empty_never_matches() {
        let expr = Expression::in_values("t.id", vec![]);
        let (sql, params) = build(&expr);

        assert_eq!(sql, "0=1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_and_wraps_operands() {
        let expr = Expression::and(vec![
            Expression::new("[[users.email]] > 1"),
            Expression::new("[[users.emailVisibility]] = TRUE"),
        ]);
        let (sql, _) = build(&expr);

        assert_eq!(
            sql,
            "(([[users.email]] > 1) AND ([[users.emailVisibility]] = TRUE))"
        );
    }

    #[test]
    fn test_or_single_operand_unwrapped() {
        let expr = Expression::or(vec![Expression::new("[[t.a]] = 1")]);
        let (sql, _) = build(&expr);
        assert_eq!(sql, "[[t.a]] = 1");
    }

    #[test]
    fn test_placeholder_numbering_is_sequential() {
        let mut params = Params::new();
        let mut counter = 0;

        let first = Expression::in_values("a.id", vec![json!("x")]);
        let second = Expression::in_values("b.id", vec![json!("y"), json!("z")]);

        assert_eq!(first.build(&mut params, &mut counter), "[[a.id]] = {:p0}");
        assert_eq!(
            second.build(&mut params, &mut counter),
            "[[b.id]] IN ({:p1}, {:p2})"
        );
        assert_eq!(params.len(), 3);
    }
}
