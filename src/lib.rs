// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Composable SQL expression engine.
//!
//! Statements are built as trees of typed value objects and compiled to a
//! parameterized SQL string plus the ordered list of bound values:
//!
//! ```
//! use sqlforge::{compile, Column, Comparable, Select};
//!
//! let select = Select::new(vec![Column::qualified("t", "id")])
//!     .where_(Column::qualified("t", "a").eq(3));
//! let (sql, parameters) = compile(&select.into()).unwrap();
//! assert_eq!(sql, "SELECT t.id FROM t WHERE t.a = ?");
//! assert_eq!(parameters, vec![3.into()]);
//! ```

mod compile;
mod expr;
mod kind;
mod value;

pub use compile::*;
pub use expr::*;
pub use kind::*;
pub use value::*;
