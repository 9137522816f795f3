// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the four DML statement nodes.
//!
//! Statements resolve their table clause in three tiers: an explicit
//! `tables`/`table` wins, then the tables auto-collected from qualified
//! columns compiled up to the point of resolution (the whole body for
//! `SELECT` and `DELETE`, the column list for `INSERT`, the `SET` pairs for
//! `UPDATE`), then the `default_tables`/`default_table` fallback. A `SELECT`
//! with no table at any tier simply omits its `FROM` clause; the other
//! statements fail to compile.

use crate::expr::{Expr, IntoExpr};

/// Conversion into a table clause expression.
///
/// Unlike [`IntoExpr`], strings convert to raw identifiers rather than bound
/// parameters: table names are structure, not data. Vectors convert to lists
/// joined by `", "`.
pub trait IntoTableExpr {
    fn into_table_expr(self) -> Expr;
}

impl IntoTableExpr for Expr {
    fn into_table_expr(self) -> Expr {
        self
    }
}

impl IntoTableExpr for &str {
    fn into_table_expr(self) -> Expr {
        Expr::Raw(self.to_owned())
    }
}

impl IntoTableExpr for String {
    fn into_table_expr(self) -> Expr {
        Expr::Raw(self)
    }
}

impl<T: IntoTableExpr> IntoTableExpr for Vec<T> {
    fn into_table_expr(self) -> Expr {
        Expr::List(self.into_iter().map(IntoTableExpr::into_table_expr).collect())
    }
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Column list; typically an [`Expr::List`].
    pub columns: Expr,
    pub where_clause: Option<Expr>,
    pub tables: Option<Expr>,
    pub default_tables: Option<Expr>,
    pub order_by: Option<Expr>,
    pub group_by: Option<Expr>,
    /// Interpolated as a decimal integer, not parameterized.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub distinct: bool,
}

impl Select {
    pub fn new(columns: impl IntoExpr) -> Self {
        Self {
            columns: columns.into_expr(),
            where_clause: None,
            tables: None,
            default_tables: None,
            order_by: None,
            group_by: None,
            limit: None,
            offset: None,
            distinct: false,
        }
    }

    pub fn where_(mut self, expr: impl IntoExpr) -> Self {
        self.where_clause = Some(expr.into_expr());
        self
    }

    pub fn tables(mut self, tables: impl IntoTableExpr) -> Self {
        self.tables = Some(tables.into_table_expr());
        self
    }

    pub fn default_tables(mut self, tables: impl IntoTableExpr) -> Self {
        self.default_tables = Some(tables.into_table_expr());
        self
    }

    pub fn order_by(mut self, expr: impl IntoExpr) -> Self {
        self.order_by = Some(expr.into_expr());
        self
    }

    pub fn group_by(mut self, expr: impl IntoExpr) -> Self {
        self.group_by = Some(expr.into_expr());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// An `INSERT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Column list; rendered bare even for qualified columns.
    pub columns: Expr,
    pub values: Expr,
    pub table: Option<Expr>,
    pub default_table: Option<Expr>,
}

impl Insert {
    pub fn new(columns: impl IntoExpr, values: impl IntoExpr) -> Self {
        Self {
            columns: columns.into_expr(),
            values: values.into_expr(),
            table: None,
            default_table: None,
        }
    }

    pub fn table(mut self, table: impl IntoTableExpr) -> Self {
        self.table = Some(table.into_table_expr());
        self
    }

    pub fn default_table(mut self, table: impl IntoTableExpr) -> Self {
        self.default_table = Some(table.into_table_expr());
        self
    }
}

/// An `UPDATE` statement.
///
/// Assignments render in insertion order; compiling an `UPDATE` with no
/// assignment at all is rejected as a malformed tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    pub set: Vec<(Expr, Expr)>,
    pub where_clause: Option<Expr>,
    pub table: Option<Expr>,
    pub default_table: Option<Expr>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `column = value` assignment.
    pub fn set(mut self, column: impl IntoExpr, value: impl IntoExpr) -> Self {
        self.set.push((column.into_expr(), value.into_expr()));
        self
    }

    pub fn where_(mut self, expr: impl IntoExpr) -> Self {
        self.where_clause = Some(expr.into_expr());
        self
    }

    pub fn table(mut self, table: impl IntoTableExpr) -> Self {
        self.table = Some(table.into_table_expr());
        self
    }

    pub fn default_table(mut self, table: impl IntoTableExpr) -> Self {
        self.default_table = Some(table.into_table_expr());
        self
    }
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delete {
    pub where_clause: Option<Expr>,
    pub table: Option<Expr>,
    pub default_table: Option<Expr>,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_(mut self, expr: impl IntoExpr) -> Self {
        self.where_clause = Some(expr.into_expr());
        self
    }

    pub fn table(mut self, table: impl IntoTableExpr) -> Self {
        self.table = Some(table.into_table_expr());
        self
    }

    pub fn default_table(mut self, table: impl IntoTableExpr) -> Self {
        self.default_table = Some(table.into_table_expr());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Column;
    use crate::kind::ExprKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_names_convert_to_raw_text() {
        assert_eq!("t".into_table_expr(), Expr::Raw("t".to_owned()));
        assert_eq!(
            vec!["t", "u"].into_table_expr(),
            Expr::List(vec![Expr::Raw("t".to_owned()), Expr::Raw("u".to_owned())])
        );
    }

    #[test]
    fn update_assignments_keep_insertion_order() {
        let update = Update::new()
            .set(Column::new("b"), 2)
            .set(Column::new("a"), 1);
        assert_eq!(update.set.len(), 2);
        assert_eq!(update.set[0].0.kind(), ExprKind::Column);
        match &update.set[0].0 {
            Expr::Column(column) => assert_eq!(column.name, "b"),
            _ => unreachable!(),
        }
    }
}
