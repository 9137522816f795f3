// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements column references and bound parameters.

use crate::expr::{Expr, IntoTableExpr};
use crate::value::Value;

/// A column reference, optionally qualified by a table expression.
///
/// Compiling a qualified column records its table in the state's auto-table
/// list, which is how statements without an explicit table clause find their
/// `FROM` tables. Names are emitted as-is; callers whose dialect needs quoting
/// quote the name themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub table: Option<Box<Expr>>,
}

impl Column {
    /// Creates an unqualified column reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    /// Creates a table-qualified column reference, rendered `table.name`.
    pub fn qualified(table: impl IntoTableExpr, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Some(Box::new(table.into_table_expr())),
        }
    }
}

/// Builds a bound parameter node for `value`.
///
/// The value is appended to the parameter list in tree-walk order and the
/// node renders as `?`; the value never appears in the SQL text.
pub fn param(value: impl Into<Value>) -> Expr {
    Expr::Param(value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qualified_column_stores_its_table_as_raw_text() {
        let column = Column::qualified("employees", "id");
        assert_eq!(column.name, "id");
        assert_eq!(column.table, Some(Box::new(Expr::Raw("employees".to_owned()))));
    }

    #[test]
    fn param_wraps_native_values() {
        assert_eq!(param(3), Expr::Param(Value::Integer(3)));
        assert_eq!(param(None::<i64>), Expr::Param(Value::Null));
    }
}
