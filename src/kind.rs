// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the dispatch tags for expression tree nodes.
//!
//! Every node carries an [`ExprKind`]; the compiler resolves a handler for a
//! node by looking up its concrete kind first and then walking the kind's
//! ancestor chain, most specific to least specific. Registering a handler for
//! a base kind such as [`ExprKind::BinaryOper`] therefore covers all of its
//! specializations at once.

/// Represents all possible kinds of nodes the compiler can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// A raw SQL string, passed through verbatim
    Raw,
    /// The SQL `NULL` literal
    Null,
    /// A sequence of sub-expressions, joined by a separator
    List,
    /// A column reference, optionally qualified by a table
    Column,
    /// A bound parameter, rendered as `?`
    Param,
    /// Base kind of all two-operand operators
    BinaryOper,
    /// Base kind of two-operand operators whose right side needs
    /// strictly-stronger binding (`a - (b - c)`)
    NonAssocBinaryOper,
    /// Base kind of n-ary operators joined by their symbol
    CompoundOper,
    /// Equality comparison `=`, rewritten to `IS NULL` for null operands
    Eq,
    /// Inequality comparison `!=`, rewritten to `IS NOT NULL`
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// Pattern match `LIKE`
    Like,
    /// Membership test `IN`
    In,
    LShift,
    RShift,
    /// Logical conjunction
    And,
    /// Logical disjunction
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// A function invocation `NAME(args…)`
    Func,
    /// `COUNT`, rendering `COUNT(*)` when no argument is given
    Count,
    Max,
    Min,
    Avg,
    Sum,
    /// Base kind of suffix modifiers such as `ASC` and `DESC`
    Suffix,
    Asc,
    Desc,
    /// A `SELECT` statement
    Select,
    /// An `INSERT` statement
    Insert,
    /// An `UPDATE` statement
    Update,
    /// A `DELETE` statement
    Delete,
    /// Base kind of every expression that offers the comparison and
    /// arithmetic builder surface
    ComparableExpr,
    /// The root of the kind hierarchy
    Expr,
    /// A caller-declared kind, see [`CustomKind`]
    Custom(&'static CustomKind),
}

/// A caller-declared node kind.
///
/// Custom kinds extend a built-in kind and inherit its handler through the
/// ancestor walk. `token` is the operator symbol (or suffix word) the
/// inherited handler emits for this kind.
///
/// ```
/// use sqlforge::{CustomKind, ExprKind};
///
/// static XOR: CustomKind = CustomKind {
///     name: "Xor",
///     extends: ExprKind::CompoundOper,
///     token: " XOR ",
/// };
/// assert_eq!(ExprKind::Custom(&XOR).parent(), Some(ExprKind::CompoundOper));
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CustomKind {
    /// Kind name, used in error messages.
    pub name: &'static str,
    /// The built-in kind this kind specializes.
    pub extends: ExprKind,
    /// Token emitted by the inherited operator or suffix handler.
    pub token: &'static str,
}

impl ExprKind {
    /// Returns the kind this kind directly specializes, if any.
    pub fn parent(self) -> Option<ExprKind> {
        match self {
            Self::Eq
            | Self::Ne
            | Self::Gt
            | Self::Ge
            | Self::Lt
            | Self::Le
            | Self::Like
            | Self::In
            | Self::LShift
            | Self::RShift => Some(Self::BinaryOper),
            Self::Sub | Self::Div | Self::Mod => Some(Self::NonAssocBinaryOper),
            Self::NonAssocBinaryOper => Some(Self::BinaryOper),
            Self::And | Self::Or | Self::Add | Self::Mul => Some(Self::CompoundOper),
            Self::Count | Self::Max | Self::Min | Self::Avg | Self::Sum => Some(Self::Func),
            Self::Asc | Self::Desc => Some(Self::Suffix),
            Self::BinaryOper | Self::CompoundOper | Self::Column | Self::Param | Self::Func => {
                Some(Self::ComparableExpr)
            }
            Self::Suffix
            | Self::Select
            | Self::Insert
            | Self::Update
            | Self::Delete
            | Self::ComparableExpr => Some(Self::Expr),
            Self::Custom(custom) => Some(custom.extends),
            // Raw and List are short-circuited by the driver, Null stands on
            // its own, Expr is the root.
            Self::Raw | Self::List | Self::Null | Self::Expr => None,
        }
    }

    /// Walks the ancestor chain, most specific first, excluding `self`.
    pub fn ancestors(self) -> impl Iterator<Item = ExprKind> {
        std::iter::successors(self.parent(), |kind| kind.parent())
    }

    /// Returns the kind name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Null => "Null",
            Self::List => "List",
            Self::Column => "Column",
            Self::Param => "Param",
            Self::BinaryOper => "BinaryOper",
            Self::NonAssocBinaryOper => "NonAssocBinaryOper",
            Self::CompoundOper => "CompoundOper",
            Self::Eq => "Eq",
            Self::Ne => "Ne",
            Self::Gt => "Gt",
            Self::Ge => "Ge",
            Self::Lt => "Lt",
            Self::Le => "Le",
            Self::Like => "Like",
            Self::In => "In",
            Self::LShift => "LShift",
            Self::RShift => "RShift",
            Self::And => "And",
            Self::Or => "Or",
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Mod => "Mod",
            Self::Func => "Func",
            Self::Count => "Count",
            Self::Max => "Max",
            Self::Min => "Min",
            Self::Avg => "Avg",
            Self::Sum => "Sum",
            Self::Suffix => "Suffix",
            Self::Asc => "Asc",
            Self::Desc => "Desc",
            Self::Select => "Select",
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::ComparableExpr => "ComparableExpr",
            Self::Expr => "Expr",
            Self::Custom(custom) => custom.name,
        }
    }

    /// Returns the operator symbol emitted between (or joining) operands.
    ///
    /// Spacing is part of the symbol: comparisons and keywords carry spaces,
    /// arithmetic symbols do not.
    pub(crate) fn oper(self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " != ",
            Self::Gt => " > ",
            Self::Ge => " >= ",
            Self::Lt => " < ",
            Self::Le => " <= ",
            Self::Like => " LIKE ",
            Self::In => " IN ",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::And => " AND ",
            Self::Or => " OR ",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Custom(custom) => custom.token,
            _ => " (unknown) ",
        }
    }

    /// Returns true for the four statement kinds.
    pub fn is_statement(self) -> bool {
        matches!(self, Self::Select | Self::Insert | Self::Update | Self::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ancestor_chain_of_comparison() {
        let chain = ExprKind::Eq.ancestors().collect::<Vec<_>>();
        assert_eq!(
            chain,
            vec![
                ExprKind::BinaryOper,
                ExprKind::ComparableExpr,
                ExprKind::Expr
            ]
        );
    }

    #[test]
    fn ancestor_chain_of_non_assoc_operator() {
        let chain = ExprKind::Sub.ancestors().collect::<Vec<_>>();
        assert_eq!(
            chain,
            vec![
                ExprKind::NonAssocBinaryOper,
                ExprKind::BinaryOper,
                ExprKind::ComparableExpr,
                ExprKind::Expr
            ]
        );
    }

    #[test]
    fn aggregates_specialize_func() {
        for kind in [ExprKind::Count, ExprKind::Max, ExprKind::Min, ExprKind::Avg, ExprKind::Sum] {
            assert_eq!(kind.parent(), Some(ExprKind::Func));
        }
    }

    #[test]
    fn custom_kind_falls_through_to_its_base() {
        static CONCAT: CustomKind = CustomKind {
            name: "Concat",
            extends: ExprKind::CompoundOper,
            token: " || ",
        };

        let kind = ExprKind::Custom(&CONCAT);
        assert_eq!(kind.name(), "Concat");
        assert_eq!(kind.oper(), " || ");
        assert_eq!(
            kind.ancestors().collect::<Vec<_>>(),
            vec![
                ExprKind::CompoundOper,
                ExprKind::ComparableExpr,
                ExprKind::Expr
            ]
        );
    }

    #[test]
    fn statement_kinds() {
        assert!(ExprKind::Select.is_statement());
        assert!(!ExprKind::Column.is_statement());
    }
}
