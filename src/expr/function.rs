// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements function invocation nodes.

use crate::expr::Expr;
use crate::kind::ExprKind;

/// A function invocation, rendered `NAME(arg1, arg2, …)`.
///
/// The aggregate constructors tag their node with the matching kind; only
/// `COUNT` carries a handler of its own (for the argument-less `COUNT(*)`
/// form), the others reach the generic function handler through the ancestor
/// walk.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncExpr {
    pub kind: ExprKind,
    pub name: String,
    pub args: Vec<Expr>,
}

impl FuncExpr {
    /// Creates an invocation of an arbitrary function.
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Func,
            name: name.into(),
            args,
        }
    }

    /// `COUNT(args…)`, or `COUNT(*)` when `args` is empty.
    pub fn count(args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Count,
            name: "COUNT".to_owned(),
            args,
        }
    }

    pub fn max(args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Max,
            name: "MAX".to_owned(),
            args,
        }
    }

    pub fn min(args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Min,
            name: "MIN".to_owned(),
            args,
        }
    }

    pub fn avg(args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Avg,
            name: "AVG".to_owned(),
            args,
        }
    }

    pub fn sum(args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Sum,
            name: "SUM".to_owned(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Column, IntoExpr};
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregates_carry_their_kind_and_name() {
        let func = FuncExpr::max(vec![Column::new("x").into_expr()]);
        assert_eq!(func.kind, ExprKind::Max);
        assert_eq!(func.name, "MAX");
    }

    #[test]
    fn count_without_arguments() {
        let func = FuncExpr::count(vec![]);
        assert_eq!(func.kind, ExprKind::Count);
        assert!(func.args.is_empty());
    }
}
