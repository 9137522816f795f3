// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements operator nodes and the fluent tree-building surface.

use crate::expr::{Expr, IntoExpr, SuffixExpr};
use crate::kind::ExprKind;

/// A two-operand operator node.
///
/// The kind tag selects the operator: any of the comparison kinds, the
/// shifts, the non-associative arithmetic kinds (`Sub`, `Div`, `Mod`), `In`,
/// or a custom kind extending one of the binary bases.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub kind: ExprKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl BinaryExpr {
    pub fn new(kind: ExprKind, left: Expr, right: Expr) -> Self {
        Self {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// An n-ary operator node whose operands are joined by the operator symbol,
/// e.g. `a AND b AND c`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundExpr {
    pub kind: ExprKind,
    pub exprs: Vec<Expr>,
}

impl CompoundExpr {
    pub fn new(kind: ExprKind, exprs: Vec<Expr>) -> Self {
        Self { kind, exprs }
    }
}

/// Fluent builders for composing expressions.
///
/// Every method wraps a non-expression operand in a bound parameter via
/// [`IntoExpr`], so `column.eq(3)` compiles to `column = ?` with `3` bound.
/// Pass [`Expr::Null`] to `eq`/`ne` to get the `IS [NOT] NULL` rewrite.
pub trait Comparable: Into<Expr> + Sized {
    fn eq(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Eq, self.into(), other.into_expr()).into()
    }

    fn ne(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Ne, self.into(), other.into_expr()).into()
    }

    fn gt(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Gt, self.into(), other.into_expr()).into()
    }

    fn ge(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Ge, self.into(), other.into_expr()).into()
    }

    fn lt(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Lt, self.into(), other.into_expr()).into()
    }

    fn le(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Le, self.into(), other.into_expr()).into()
    }

    fn like(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Like, self.into(), other.into_expr()).into()
    }

    /// Membership test; `other` is usually a list of parameters or a
    /// sub-select and always renders inside parentheses.
    fn is_in(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::In, self.into(), other.into_expr()).into()
    }

    fn shl(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::LShift, self.into(), other.into_expr()).into()
    }

    fn shr(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::RShift, self.into(), other.into_expr()).into()
    }

    fn and(self, other: impl IntoExpr) -> Expr {
        CompoundExpr::new(ExprKind::And, vec![self.into(), other.into_expr()]).into()
    }

    fn or(self, other: impl IntoExpr) -> Expr {
        CompoundExpr::new(ExprKind::Or, vec![self.into(), other.into_expr()]).into()
    }

    fn add(self, other: impl IntoExpr) -> Expr {
        CompoundExpr::new(ExprKind::Add, vec![self.into(), other.into_expr()]).into()
    }

    fn sub(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Sub, self.into(), other.into_expr()).into()
    }

    fn mul(self, other: impl IntoExpr) -> Expr {
        CompoundExpr::new(ExprKind::Mul, vec![self.into(), other.into_expr()]).into()
    }

    fn div(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Div, self.into(), other.into_expr()).into()
    }

    fn modulo(self, other: impl IntoExpr) -> Expr {
        BinaryExpr::new(ExprKind::Mod, self.into(), other.into_expr()).into()
    }

    /// Ascending sort modifier for `ORDER BY` lists.
    fn asc(self) -> Expr {
        SuffixExpr::asc(self.into()).into()
    }

    /// Descending sort modifier for `ORDER BY` lists.
    fn desc(self) -> Expr {
        SuffixExpr::desc(self.into()).into()
    }
}

impl Comparable for Expr {}
impl Comparable for crate::expr::Column {}
impl Comparable for crate::expr::FuncExpr {}
impl Comparable for BinaryExpr {}
impl Comparable for CompoundExpr {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Column;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn builders_wrap_plain_operands() {
        let expr = Column::new("a").eq(3);
        match expr {
            Expr::Binary(binary) => {
                assert_eq!(binary.kind, ExprKind::Eq);
                assert_eq!(*binary.right, Expr::Param(Value::Integer(3)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn null_operands_stay_unwrapped() {
        let expr = Column::new("a").ne(Expr::Null);
        match expr {
            Expr::Binary(binary) => assert_eq!(*binary.right, Expr::Null),
            _ => unreachable!(),
        }
    }

    #[test]
    fn chained_builders_nest() {
        let expr = Column::new("a").eq(1).or(Column::new("b").eq(2));
        assert_eq!(expr.kind(), ExprKind::Or);
    }
}
