// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements suffix modifier nodes such as `ASC` and `DESC`.

use crate::expr::Expr;
use crate::kind::ExprKind;

/// A suffix modifier, rendered `inner SUFFIX`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuffixExpr {
    pub kind: ExprKind,
    pub suffix: String,
    pub expr: Box<Expr>,
}

impl SuffixExpr {
    /// Creates a suffix modifier with an arbitrary suffix word.
    pub fn new(suffix: impl Into<String>, expr: Expr) -> Self {
        Self {
            kind: ExprKind::Suffix,
            suffix: suffix.into(),
            expr: Box::new(expr),
        }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            kind: ExprKind::Asc,
            suffix: "ASC".to_owned(),
            expr: Box::new(expr),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            kind: ExprKind::Desc,
            suffix: "DESC".to_owned(),
            expr: Box::new(expr),
        }
    }
}
