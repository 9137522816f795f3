// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the expression compiler.
//!
//! [`Compile`] pairs a handler table with a precedence table. Compiling walks
//! the tree recursively: each node's handler renders a fragment and calls
//! back into the driver for its children, so precedence and state propagate
//! no matter how deeply handlers nest. A populated compiler is safe for
//! concurrent read-only use; customization happens on a [`clone`](Clone)
//! during setup, never on a shared instance.

mod handlers;
mod state;

use std::collections::HashMap;

use crate::expr::Expr;
use crate::kind::ExprKind;
use crate::value::Value;

pub use state::{Scope, State};

/// Precedence assigned to kinds without an entry in the precedence table.
/// Greater than every registered precedence, so such kinds are never
/// parenthesized on precedence grounds.
pub const MAX_PRECEDENCE: f32 = 1000.0;

/// Renders one node kind to a SQL fragment.
///
/// Handlers receive the compiler to recurse into child expressions and the
/// state to record parameters and tables. The driver has already installed
/// the node's own precedence as `state.precedence` when a handler runs.
pub type Handler = fn(&Compile, &mut State, &Expr) -> Result<String, CompileError>;

/// Possible errors that might occur during compiling.
#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum CompileError {
    #[error("Don't know how to compile {0}")]
    UnknownKind(String),
    #[error("Couldn't find any table(s)")]
    MissingTables,
    #[error("Malformed expression tree: {0}")]
    MalformedTree(String),
}

/// A compiler: per-kind handlers plus per-kind precedences.
///
/// [`Compile::default()`] carries the full built-in handler set; the global
/// instance behind [`compile()`] is one such compiler. Cloning deep-copies
/// both tables, so a customized clone shares nothing mutable with its parent.
#[derive(Debug, Clone)]
pub struct Compile {
    handlers: HashMap<ExprKind, Handler>,
    precedence: HashMap<ExprKind, f32>,
}

impl Compile {
    /// Creates a compiler with empty tables. Useful as a base for fully
    /// custom kind universes; most callers start from
    /// [`Compile::default()`] instead.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            precedence: HashMap::new(),
        }
    }

    /// Associates `handler` with each of `kinds`, overwriting any prior
    /// registration.
    pub fn register(&mut self, kinds: &[ExprKind], handler: Handler) {
        for kind in kinds {
            self.handlers.insert(*kind, handler);
        }
    }

    /// Sets the precedence for each of `kinds`. Lower binds looser.
    pub fn set_precedence(&mut self, precedence: f32, kinds: &[ExprKind]) {
        for kind in kinds {
            self.precedence.insert(*kind, precedence);
        }
    }

    /// Returns the precedence registered for `kind`, or [`MAX_PRECEDENCE`].
    pub fn precedence_of(&self, kind: ExprKind) -> f32 {
        self.precedence.get(&kind).copied().unwrap_or(MAX_PRECEDENCE)
    }

    /// Compiles a whole tree, returning the SQL text and the bound parameter
    /// values in placeholder order.
    pub fn compile(&self, expr: &Expr) -> Result<(String, Vec<Value>), CompileError> {
        let mut state = State::new();
        let sql = self.compile_expr(&mut state, expr)?;
        Ok((sql, state.parameters))
    }

    /// Compiles a sub-expression with the default `", "` list separator.
    pub fn compile_expr(&self, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
        self.compile_join(state, expr, ", ")
    }

    /// Compiles a sub-expression, joining list elements with `join`.
    ///
    /// Raw strings pass through untouched and list elements each see the
    /// same outer precedence; everything else goes through handler dispatch.
    pub fn compile_join(
        &self,
        state: &mut State,
        expr: &Expr,
        join: &str,
    ) -> Result<String, CompileError> {
        let outer_precedence = state.precedence;
        let sql = match expr {
            Expr::Raw(text) => text.clone(),
            Expr::List(items) => self.compile_seq(state, items, join)?,
            _ => self.compile_single(state, expr, outer_precedence)?,
        };
        state.precedence = outer_precedence;
        Ok(sql)
    }

    /// Compiles a slice of sub-expressions and joins the fragments.
    pub fn compile_seq(
        &self,
        state: &mut State,
        items: &[Expr],
        join: &str,
    ) -> Result<String, CompileError> {
        let outer_precedence = state.precedence;
        let mut compiled = Vec::with_capacity(items.len());
        for item in items {
            let fragment = match item {
                Expr::Raw(text) => text.clone(),
                Expr::List(nested) => {
                    state.precedence = outer_precedence;
                    self.compile_seq(state, nested, join)?
                }
                _ => self.compile_single(state, item, outer_precedence)?,
            };
            compiled.push(fragment);
        }
        state.precedence = outer_precedence;
        Ok(compiled.join(join))
    }

    fn compile_single(
        &self,
        state: &mut State,
        expr: &Expr,
        outer_precedence: f32,
    ) -> Result<String, CompileError> {
        let handler = self.dispatch(expr.kind())?;
        let inner_precedence = self.precedence_of(expr.kind());
        state.precedence = inner_precedence;
        let mut sql = handler(self, state, expr)?;
        if inner_precedence < outer_precedence {
            sql = format!("({sql})");
        }
        Ok(sql)
    }

    /// Resolves the handler for `kind`: the concrete kind first, then its
    /// ancestor chain, most specific to least specific.
    fn dispatch(&self, kind: ExprKind) -> Result<Handler, CompileError> {
        if let Some(handler) = self.handlers.get(&kind) {
            return Ok(*handler);
        }
        for ancestor in kind.ancestors() {
            if let Some(handler) = self.handlers.get(&ancestor) {
                return Ok(*handler);
            }
        }
        Err(CompileError::UnknownKind(kind.name().to_owned()))
    }
}

impl Default for Compile {
    /// The built-in compiler: handlers for every shipped node kind and the
    /// standard operator precedence table.
    fn default() -> Self {
        let mut compile = Compile::empty();
        handlers::register_builtins(&mut compile);
        compile
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_COMPILE: Compile = Compile::default();
}

/// Compiles `expr` with the process-wide default compiler.
pub fn compile(expr: &Expr) -> Result<(String, Vec<Value>), CompileError> {
    DEFAULT_COMPILE.compile(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{raw, Column, Comparable, IntoExpr};
    use crate::kind::CustomKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn unregistered_kind_reports_its_name() {
        let compile = Compile::empty();
        let result = compile.compile(&Column::new("a").into_expr());
        assert_eq!(
            result,
            Err(CompileError::UnknownKind("Column".to_owned()))
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Don't know how to compile Column"
        );
    }

    #[test]
    fn precedence_defaults_to_max() {
        let compile = Compile::empty();
        assert_eq!(compile.precedence_of(ExprKind::Column), MAX_PRECEDENCE);
    }

    #[test]
    fn dispatch_walks_the_ancestor_chain() {
        // Gt has no handler of its own; the registration for BinaryOper
        // covers it.
        let (sql, _) = compile(&Column::new("a").gt(Column::new("b"))).unwrap();
        assert_eq!(sql, "a > b");
    }

    #[test]
    fn clones_share_nothing_mutable() {
        static MATCHES: CustomKind = CustomKind {
            name: "Matches",
            extends: ExprKind::BinaryOper,
            token: " ~ ",
        };
        let kind = ExprKind::Custom(&MATCHES);

        let mut customized = DEFAULT_COMPILE.clone();
        customized.set_precedence(40.0, &[kind]);

        let expr: Expr =
            crate::expr::BinaryExpr::new(kind, Column::new("a").into_expr(), 1.into_expr()).into();
        let (sql, _) = customized.compile(&expr).unwrap();
        assert_eq!(sql, "a ~ ?");

        // The clone's tables never leak back into the default compiler.
        assert_eq!(DEFAULT_COMPILE.precedence_of(kind), MAX_PRECEDENCE);
    }

    #[test]
    fn register_overwrites_prior_handlers() {
        fn lowercase_null(_: &Compile, _: &mut State, _: &Expr) -> Result<String, CompileError> {
            Ok("null".to_owned())
        }

        let mut customized = DEFAULT_COMPILE.clone();
        customized.register(&[ExprKind::Null], lowercase_null);
        let (sql, _) = customized.compile(&Expr::Null).unwrap();
        assert_eq!(sql, "null");

        let (sql, _) = compile(&Expr::Null).unwrap();
        assert_eq!(sql, "NULL");
    }

    #[test]
    fn raw_strings_pass_through_without_state() {
        let (sql, parameters) = compile(&raw("SELECT 1")).unwrap();
        assert_eq!(sql, "SELECT 1");
        assert!(parameters.is_empty());
    }
}
