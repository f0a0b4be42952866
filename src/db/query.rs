//! SELECT query assembly.

use super::expression::{Expression, Params};

/// A single LEFT JOIN attached to a query
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Table name or table expression (e.g. a `json_each(...)` call)
    pub table: String,

    /// Join alias
    pub alias: String,

    /// Optional join condition
    pub on: Option<Expression>,
}

/// A rendered query: SQL text plus its bound parameters
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    /// The SQL text
    pub sql: String,

    /// All collected parameters
    pub params: Params,
}

/// A SELECT query under construction
#[derive(Debug, Clone)]
pub struct SelectQuery {
    columns: Vec<String>,
    from: String,
    distinct: bool,
    joins: Vec<JoinClause>,
    where_expr: Option<Expression>,
}

impl SelectQuery {
    /// Create a `SELECT `table`.* FROM `table`` query
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            columns: vec![format!("{}.*", quote_table(&table))],
            from: table,
            distinct: false,
            joins: Vec::new(),
            where_expr: None,
        }
    }

    /// Toggles the DISTINCT modifier
    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Whether the DISTINCT modifier is set
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Appends a LEFT JOIN clause
    pub fn left_join(
        &mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: Option<Expression>,
    ) -> &mut Self {
        self.joins.push(JoinClause {
            table: table.into(),
            alias: alias.into(),
            on,
        });
        self
    }

    /// Returns the attached joins in insertion order
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// ANDs a condition onto the WHERE clause
    pub fn and_where(&mut self, expr: Expression) -> &mut Self {
        self.where_expr = Some(match self.where_expr.take() {
            None => expr,
            Some(prev) => Expression::and(vec![prev, expr]),
        });
        self
    }

    /// Renders the query to SQL, collecting all bound parameters
    pub fn build(&self) -> BuiltQuery {
        let mut params = Params::new();
        let mut counter = 0;

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.columns.join(", "));
        sql.push_str(" FROM ");
        sql.push_str(&quote_table(&self.from));

        for join in &self.joins {
            sql.push_str(" LEFT JOIN ");
            sql.push_str(&quote_table(&join.table));
            sql.push(' ');
            sql.push_str(&quote_table(&join.alias));
            if let Some(on) = &join.on {
                sql.push_str(" ON ");
                sql.push_str(&on.build(&mut params, &mut counter));
            }
        }

        if let Some(expr) = &self.where_expr {
            sql.push_str(" WHERE ");
            sql.push_str(&expr.build(&mut params, &mut counter));
        }

        BuiltQuery { sql, params }
    }
}

/// Backtick-quotes plain table identifiers; table expressions such as
/// `json_each(...)` pass through untouched.
fn quote_table(name: &str) -> String {
    let is_plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_plain {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}
