// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the built-in handlers and the default precedence table.

use indexmap::IndexSet;

use crate::compile::{Compile, CompileError, Scope, State};
use crate::expr::{BinaryExpr, Expr};
use crate::kind::ExprKind;

/// Registers every built-in handler and the standard precedences on
/// `compile`.
pub(super) fn register_builtins(compile: &mut Compile) {
    use ExprKind::*;

    compile.register(&[Null], compile_null);
    compile.register(&[Column], compile_column);
    compile.register(&[Param], compile_param);
    compile.register(&[BinaryOper], compile_binary_oper);
    compile.register(&[NonAssocBinaryOper], compile_non_assoc_binary_oper);
    compile.register(&[CompoundOper], compile_compound_oper);
    compile.register(&[Eq], compile_eq);
    compile.register(&[Ne], compile_ne);
    compile.register(&[In], compile_in);
    compile.register(&[Func], compile_func);
    compile.register(&[Count], compile_count);
    compile.register(&[Suffix], compile_suffix);
    compile.register(&[Select], compile_select);
    compile.register(&[Insert], compile_insert);
    compile.register(&[Update], compile_update);
    compile.register(&[Delete], compile_delete);

    compile.set_precedence(10.0, &[Select, Insert, Update, Delete]);
    compile.set_precedence(20.0, &[Or]);
    compile.set_precedence(30.0, &[And]);
    compile.set_precedence(40.0, &[Eq, Ne, Gt, Ge, Lt, Le, Like, In]);
    compile.set_precedence(50.0, &[LShift, RShift]);
    compile.set_precedence(60.0, &[Add, Sub]);
    compile.set_precedence(70.0, &[Mul, Div, Mod]);
}

fn malformed(handler: &str, expr: &Expr) -> CompileError {
    CompileError::MalformedTree(format!(
        "{handler} handler can't render a {} node",
        expr.kind().name()
    ))
}

fn expect_binary<'a>(handler: &str, expr: &'a Expr) -> Result<&'a BinaryExpr, CompileError> {
    match expr {
        Expr::Binary(binary) => Ok(binary),
        _ => Err(malformed(handler, expr)),
    }
}

fn compile_null(_: &Compile, _: &mut State, _: &Expr) -> Result<String, CompileError> {
    Ok("NULL".to_owned())
}

fn compile_column(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let column = match expr {
        Expr::Column(column) => column,
        _ => return Err(malformed("column", expr)),
    };
    if let Some(table) = &column.table {
        state.auto_tables.push((**table).clone());
        if !state.omit_column_tables {
            let table = compile.compile_expr(state, table)?;
            return Ok(format!("{}.{}", table, column.name));
        }
    }
    Ok(column.name.clone())
}

fn compile_param(_: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let value = match expr {
        Expr::Param(value) => value,
        _ => return Err(malformed("param", expr)),
    };
    state.parameters.push(value.clone());
    Ok("?".to_owned())
}

fn compile_binary_oper(
    compile: &Compile,
    state: &mut State,
    expr: &Expr,
) -> Result<String, CompileError> {
    let oper = expect_binary("binary operator", expr)?;
    let left = compile.compile_expr(state, &oper.left)?;
    let right = compile.compile_expr(state, &oper.right)?;
    Ok(format!("{}{}{}", left, oper.kind.oper(), right))
}

fn compile_non_assoc_binary_oper(
    compile: &Compile,
    state: &mut State,
    expr: &Expr,
) -> Result<String, CompileError> {
    let oper = expect_binary("binary operator", expr)?;
    let left = compile.compile_expr(state, &oper.left)?;
    // The right operand sees a strictly greater outer precedence, forcing
    // parentheses around an equal-precedence right child: a - (b - c).
    state.precedence += 0.5;
    let right = compile.compile_expr(state, &oper.right)?;
    Ok(format!("{}{}{}", left, oper.kind.oper(), right))
}

fn compile_compound_oper(
    compile: &Compile,
    state: &mut State,
    expr: &Expr,
) -> Result<String, CompileError> {
    let oper = match expr {
        Expr::Compound(compound) => compound,
        _ => return Err(malformed("compound operator", expr)),
    };
    compile.compile_seq(state, &oper.exprs, oper.kind.oper())
}

fn compile_eq(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let eq = expect_binary("equality", expr)?;
    if matches!(*eq.right, Expr::Null) {
        return Ok(format!("{} IS NULL", compile.compile_expr(state, &eq.left)?));
    }
    let left = compile.compile_expr(state, &eq.left)?;
    let right = compile.compile_expr(state, &eq.right)?;
    Ok(format!("{left} = {right}"))
}

fn compile_ne(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let ne = expect_binary("inequality", expr)?;
    if matches!(*ne.right, Expr::Null) {
        return Ok(format!(
            "{} IS NOT NULL",
            compile.compile_expr(state, &ne.left)?
        ));
    }
    let left = compile.compile_expr(state, &ne.left)?;
    let right = compile.compile_expr(state, &ne.right)?;
    Ok(format!("{left} != {right}"))
}

fn compile_in(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let oper = expect_binary("membership", expr)?;
    let left = compile.compile_expr(state, &oper.left)?;
    // The parentheses are part of the syntax here, so the right side must
    // not bring its own.
    state.precedence = 0.0;
    let right = compile.compile_expr(state, &oper.right)?;
    Ok(format!("{left} IN ({right})"))
}

fn compile_func(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let func = match expr {
        Expr::Func(func) => func,
        _ => return Err(malformed("function", expr)),
    };
    let args = compile.compile_seq(state, &func.args, ", ")?;
    Ok(format!("{}({})", func.name, args))
}

fn compile_count(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    match expr {
        Expr::Func(func) if func.args.is_empty() => Ok("COUNT(*)".to_owned()),
        _ => compile_func(compile, state, expr),
    }
}

fn compile_suffix(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let suffix = match expr {
        Expr::Suffix(suffix) => suffix,
        _ => return Err(malformed("suffix", expr)),
    };
    let inner = compile.compile_expr(state, &suffix.expr)?;
    Ok(format!("{} {}", inner, suffix.suffix))
}

/// Resolves a statement's table clause: explicit tables win, then the
/// auto-collected tables (deduplicated, first seen first), then the default.
fn resolve_tables(
    compile: &Compile,
    state: &mut State,
    tables: Option<&Expr>,
    default_tables: Option<&Expr>,
) -> Result<String, CompileError> {
    if let Some(tables) = tables {
        return compile.compile_expr(state, tables);
    }
    if !state.auto_tables.is_empty() {
        let auto_tables = state.auto_tables.clone();
        let mut compiled = IndexSet::new();
        for table in &auto_tables {
            compiled.insert(compile.compile_expr(state, table)?);
        }
        return Ok(compiled.into_iter().collect::<Vec<_>>().join(", "));
    }
    if let Some(default_tables) = default_tables {
        return compile.compile_expr(state, default_tables);
    }
    Err(CompileError::MissingTables)
}

/// Compiles the table clause after the statement body, splicing any
/// parameters bound by table expressions into `parameters_pos` so the
/// parameter list keeps matching the placeholder order of the final text.
fn compile_table_clause(
    compile: &Compile,
    state: &mut State,
    tables: Option<&Expr>,
    default_tables: Option<&Expr>,
    parameters_pos: usize,
) -> Result<String, CompileError> {
    state.push(Scope::Parameters(Vec::new()));
    let result = resolve_tables(compile, state, tables, default_tables);
    let table_parameters = std::mem::take(&mut state.parameters);
    state.pop();
    let sql = result?;

    let tail = state.parameters.split_off(parameters_pos);
    state.parameters.extend(table_parameters);
    state.parameters.extend(tail);
    Ok(sql)
}

fn compile_select(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let select = match expr {
        Expr::Select(select) => select,
        _ => return Err(malformed("select", expr)),
    };
    state.scoped(Scope::AutoTables(Vec::new()), |state| {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&compile.compile_expr(state, &select.columns)?);

        // The FROM clause is materialized last so qualified columns in any
        // clause can still contribute their tables; remember where it goes.
        let tables_pos = sql.len();
        let parameters_pos = state.parameters.len();

        if let Some(where_clause) = &select.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&compile.compile_expr(state, where_clause)?);
        }
        if let Some(order_by) = &select.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&compile.compile_expr(state, order_by)?);
        }
        if let Some(group_by) = &select.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(&compile.compile_expr(state, group_by)?);
        }
        if let Some(limit) = select.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = select.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let has_tables = select.tables.is_some()
            || select.default_tables.is_some()
            || !state.auto_tables.is_empty();
        if has_tables {
            let tables = compile_table_clause(
                compile,
                state,
                select.tables.as_ref(),
                select.default_tables.as_ref(),
                parameters_pos,
            )?;
            sql.insert_str(tables_pos, &format!(" FROM {tables}"));
        }
        Ok(sql)
    })
}

fn compile_insert(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let insert = match expr {
        Expr::Insert(insert) => insert,
        _ => return Err(malformed("insert", expr)),
    };
    state.scoped(Scope::AutoTables(state.auto_tables.clone()), |state| {
        let parameters_pos = state.parameters.len();
        let columns = state.scoped(Scope::OmitColumnTables(true), |state| {
            compile.compile_expr(state, &insert.columns)
        })?;
        let table = compile_table_clause(
            compile,
            state,
            insert.table.as_ref(),
            insert.default_table.as_ref(),
            parameters_pos,
        )?;
        let values = compile.compile_expr(state, &insert.values)?;
        Ok(format!("INSERT INTO {table} ({columns}) VALUES ({values})"))
    })
}

fn compile_update(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let update = match expr {
        Expr::Update(update) => update,
        _ => return Err(malformed("update", expr)),
    };
    if update.set.is_empty() {
        return Err(CompileError::MalformedTree(
            "UPDATE needs at least one assignment".to_owned(),
        ));
    }
    state.scoped(Scope::AutoTables(state.auto_tables.clone()), |state| {
        let parameters_pos = state.parameters.len();
        let mut sets = Vec::with_capacity(update.set.len());
        for (column, value) in &update.set {
            let target = state.scoped(Scope::OmitColumnTables(true), |state| {
                compile.compile_expr(state, column)
            })?;
            let value = compile.compile_expr(state, value)?;
            sets.push(format!("{target}={value}"));
        }

        // Resolved before WHERE; only the SET pairs contribute tables.
        let table = compile_table_clause(
            compile,
            state,
            update.table.as_ref(),
            update.default_table.as_ref(),
            parameters_pos,
        )?;

        let mut sql = format!("UPDATE {table} SET {}", sets.join(", "));
        if let Some(where_clause) = &update.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&compile.compile_expr(state, where_clause)?);
        }
        Ok(sql)
    })
}

fn compile_delete(compile: &Compile, state: &mut State, expr: &Expr) -> Result<String, CompileError> {
    let delete = match expr {
        Expr::Delete(delete) => delete,
        _ => return Err(malformed("delete", expr)),
    };
    state.scoped(Scope::AutoTables(state.auto_tables.clone()), |state| {
        let parameters_pos = state.parameters.len();
        let mut body = String::new();
        if let Some(where_clause) = &delete.where_clause {
            body.push_str(" WHERE ");
            body.push_str(&compile.compile_expr(state, where_clause)?);
        }

        // Resolved only now, so columns inside WHERE contribute tables.
        let table = compile_table_clause(
            compile,
            state,
            delete.table.as_ref(),
            delete.default_table.as_ref(),
            parameters_pos,
        )?;
        Ok(format!("DELETE FROM {table}{body}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::expr::{param, Column, Comparable, FuncExpr, IntoExpr, Update};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn null_literal_renders_as_keyword() {
        let (sql, parameters) = compile(&Expr::Null).unwrap();
        assert_eq!(sql, "NULL");
        assert!(parameters.is_empty());
    }

    #[test]
    fn equality_with_null_rewrites_to_is_null() {
        let (sql, parameters) = compile(&Column::new("a").eq(Expr::Null)).unwrap();
        assert_eq!(sql, "a IS NULL");
        assert!(parameters.is_empty());

        let (sql, _) = compile(&Column::new("a").ne(Expr::Null)).unwrap();
        assert_eq!(sql, "a IS NOT NULL");
    }

    #[test]
    fn equality_with_zero_still_binds_a_parameter() {
        let (sql, parameters) = compile(&Column::new("a").eq(0)).unwrap();
        assert_eq!(sql, "a = ?");
        assert_eq!(parameters, vec![Value::Integer(0)]);
    }

    #[test]
    fn count_star_and_count_column() {
        let (sql, _) = compile(&FuncExpr::count(vec![]).into_expr()).unwrap();
        assert_eq!(sql, "COUNT(*)");

        let (sql, _) =
            compile(&FuncExpr::count(vec![Column::new("x").into_expr()]).into_expr()).unwrap();
        assert_eq!(sql, "COUNT(x)");
    }

    #[test]
    fn aggregates_reach_the_generic_function_handler() {
        let (sql, _) = compile(&FuncExpr::max(vec![Column::new("x").into_expr()]).into_expr())
            .unwrap();
        assert_eq!(sql, "MAX(x)");
    }

    #[test]
    fn update_with_empty_set_is_rejected() {
        let update = Update::new().table("t").into_expr();
        assert_eq!(
            compile(&update),
            Err(CompileError::MalformedTree(
                "UPDATE needs at least one assignment".to_owned()
            ))
        );
    }

    #[test]
    fn handlers_reject_mismatched_nodes() {
        let result = compile_eq(
            &Compile::default(),
            &mut State::new(),
            &param(1),
        );
        assert_eq!(
            result,
            Err(CompileError::MalformedTree(
                "equality handler can't render a Param node".to_owned()
            ))
        );
    }
}
