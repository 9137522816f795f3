// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the typed expression tree for SQL.
//!
//! Trees are immutable after construction and may be shared freely; compiling
//! never mutates a node. The [`Expr`] enum is the structural shape of a node,
//! while its [`ExprKind`] tag drives handler dispatch, so many kinds share one
//! carrier struct (all binary operators are a [`BinaryExpr`], and so on).

mod column;
mod function;
mod operator;
mod statement;
mod suffix;

use crate::kind::ExprKind;
use crate::value::Value;

pub use column::{param, Column};
pub use function::FuncExpr;
pub use operator::{BinaryExpr, Comparable, CompoundExpr};
pub use statement::{Delete, Insert, IntoTableExpr, Select, Update};
pub use suffix::SuffixExpr;

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A raw SQL fragment, rendered verbatim.
    Raw(String),
    /// The SQL `NULL` literal.
    Null,
    /// A sequence of sub-expressions. Not dispatched through the handler
    /// table; the driver joins the compiled elements with a separator.
    List(Vec<Expr>),
    Column(Column),
    /// A bound parameter.
    Param(Value),
    Binary(BinaryExpr),
    Compound(CompoundExpr),
    Func(FuncExpr),
    Suffix(SuffixExpr),
    Select(Box<Select>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
}

impl Expr {
    /// Returns the dispatch tag of this node.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Raw(_) => ExprKind::Raw,
            Expr::Null => ExprKind::Null,
            Expr::List(_) => ExprKind::List,
            Expr::Column(_) => ExprKind::Column,
            Expr::Param(_) => ExprKind::Param,
            Expr::Binary(binary) => binary.kind,
            Expr::Compound(compound) => compound.kind,
            Expr::Func(func) => func.kind,
            Expr::Suffix(suffix) => suffix.kind,
            Expr::Select(_) => ExprKind::Select,
            Expr::Insert(_) => ExprKind::Insert,
            Expr::Update(_) => ExprKind::Update,
            Expr::Delete(_) => ExprKind::Delete,
        }
    }
}

/// Builds a raw SQL fragment node.
///
/// Raw text passes through the compiler untouched; use it for `*` column
/// lists, table names in ad-hoc positions, or vendor syntax the tree does not
/// model. Anything user-supplied belongs in a [`param`](crate::param) instead.
pub fn raw(text: impl Into<String>) -> Expr {
    Expr::Raw(text.into())
}

/// Conversion into an expression node.
///
/// Implementations for plain Rust values wrap the value in a bound parameter,
/// which is what the comparison and arithmetic builders of [`Comparable`]
/// rely on: `column.eq(3)` binds `3` rather than interpolating it. Values
/// that already are expressions convert structurally, so [`Expr::Null`]
/// reaches the equality handlers unwrapped and the `IS NULL` rewrite fires.
/// Vectors of expressions or columns become [`Expr::List`]s; `Vec<u8>` is
/// the exception and binds as a single `Bytes` parameter.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Param(self)
    }
}

macro_rules! into_expr_as_param {
    ($( $ty:ty ),+ $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Param(self.into())
                }
            }
        )+
    };
}

into_expr_as_param!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String);

/// A byte blob binds as one `Bytes` parameter, like [`Value::from`].
impl IntoExpr for Vec<u8> {
    fn into_expr(self) -> Expr {
        Expr::Param(self.into())
    }
}

macro_rules! into_expr_as_list {
    ($( $ty:ty ),+ $(,)?) => {
        $(
            impl IntoExpr for Vec<$ty> {
                fn into_expr(self) -> Expr {
                    Expr::List(self.into_iter().map(IntoExpr::into_expr).collect())
                }
            }
        )+
    };
}

into_expr_as_list!(Expr, Column);

macro_rules! expr_from_node {
    ($( $ty:ident => $variant:ident ),+ $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(node: $ty) -> Self {
                    Expr::$variant(node)
                }
            }

            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    self.into()
                }
            }
        )+
    };
}

expr_from_node!(
    Column => Column,
    BinaryExpr => Binary,
    CompoundExpr => Compound,
    FuncExpr => Func,
    SuffixExpr => Suffix,
);

macro_rules! expr_from_statement {
    ($( $ty:ident => $variant:ident ),+ $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(statement: $ty) -> Self {
                    Expr::$variant(Box::new(statement))
                }
            }

            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    self.into()
                }
            }
        )+
    };
}

expr_from_statement!(
    Select => Select,
    Insert => Insert,
    Update => Update,
    Delete => Delete,
);

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_values_wrap_into_params() {
        assert_eq!(3.into_expr(), Expr::Param(Value::Integer(3)));
        assert_eq!("x".into_expr(), Expr::Param(Value::Text("x".to_owned())));
        assert_eq!(true.into_expr(), Expr::Param(Value::Bool(true)));
    }

    #[test]
    fn expressions_pass_through_unwrapped() {
        assert_eq!(Expr::Null.into_expr(), Expr::Null);
        assert_eq!(raw("*").into_expr(), Expr::Raw("*".to_owned()));
    }

    #[test]
    fn vectors_become_lists() {
        let list = vec![Column::new("a"), Column::new("b")].into_expr();
        assert_eq!(list.kind(), ExprKind::List);
        match list {
            Expr::List(items) => assert_eq!(items.len(), 2),
            _ => unreachable!(),
        }
    }

    #[test]
    fn byte_vectors_bind_as_one_bytes_parameter() {
        assert_eq!(
            vec![1u8, 2, 3].into_expr(),
            Expr::Param(Value::Bytes(vec![1, 2, 3]))
        );
    }
}
