use super::ast::{Arg, FieldRef, Method, Piece};
use crate::Result;

use std::fmt;

/// A compiled SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpr {
    sql: String,
}

/// Supplies the SQL for field tokens.
pub(crate) trait ResolveField {
    fn resolve(&mut self, field: &FieldRef) -> Result<CompiledExpr>;
}

impl CompiledExpr {
    pub fn new(sql: impl Into<String>) -> CompiledExpr {
        CompiledExpr { sql: sql.into() }
    }

    /// A string literal.
    pub fn literal(text: &str) -> CompiledExpr {
        CompiledExpr::new(quote(text))
    }

    /// `CONCAT(...)` of the given parts.
    pub fn concat(parts: Vec<CompiledExpr>) -> CompiledExpr {
        if parts.is_empty() {
            return CompiledExpr::literal("");
        }

        let parts: Vec<_> = parts.into_iter().map(CompiledExpr::into_sql).collect();
        CompiledExpr::new(format!("CONCAT({})", parts.join(", ")))
    }

    pub fn as_sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Compiles each piece, children before parents. Empty text is dropped.
pub(crate) fn eval_pieces(
    pieces: &[Piece],
    resolve: &mut impl ResolveField,
) -> Result<Vec<CompiledExpr>> {
    let mut exprs = Vec::with_capacity(pieces.len());

    for piece in pieces {
        match piece {
            Piece::Text(text) if text.is_empty() => {}
            Piece::Text(text) => exprs.push(CompiledExpr::literal(text)),
            Piece::Field(field) => exprs.push(resolve.resolve(field)?),
            Piece::Method(method) => exprs.push(eval_method(method, resolve)?),
        }
    }

    Ok(exprs)
}

fn eval_method(method: &Method, resolve: &mut impl ResolveField) -> Result<CompiledExpr> {
    let mut args = Vec::with_capacity(method.args.len());

    for (i, arg) in method.args.iter().enumerate() {
        let numeric = method.func.takes_count() && i == 1;
        args.push(eval_arg(arg, numeric, resolve)?);
    }

    method.func.render(&args)
}

fn eval_arg(arg: &Arg, numeric: bool, resolve: &mut impl ResolveField) -> Result<CompiledExpr> {
    if numeric {
        if let [Piece::Text(text)] = arg.content.as_slice() {
            let text = text.trim();
            if text.parse::<i64>().is_ok() {
                return Ok(CompiledExpr::new(text));
            }
        }
    }

    let mut parts = eval_pieces(&arg.content, resolve)?;

    Ok(if parts.len() == 1 {
        parts.remove(0)
    } else {
        CompiledExpr::concat(parts)
    })
}
