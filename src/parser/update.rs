use super::ast::{Intent, Predicate};
use super::binder::ParameterBinder;
use super::lexer::{Cursor, ValueExpr};
use crate::core::{Result, Row};

/// `UPDATE <table> SET <col> = <val-or-?>, ... WHERE <col> = ?`
///
/// SET placeholders consume arguments left to right. The WHERE value is always the
/// last argument, so callers pass `[...set_values, where_value]`.
pub fn parse_update(statement: &str, binder: &ParameterBinder<'_>) -> Result<Intent> {
    let mut cursor = Cursor::new(statement)?;
    cursor.expect_kw("UPDATE")?;
    let table = cursor.parse_table_name()?;

    cursor.expect_kw("SET")?;
    let assignments = cursor.parse_comma_separated(|c| c.parse_equality())?;

    cursor.expect_kw("WHERE")?;
    let (where_column, where_expr) = cursor.parse_equality()?;
    cursor.expect_end()?;

    let set_placeholders = assignments
        .iter()
        .filter(|(_, expr)| expr.is_placeholder())
        .count();
    let expected = set_placeholders + usize::from(where_expr.is_placeholder());
    binder.expect_count(expected)?;

    let mut next_arg = 0;
    let mut set_values = Row::new();
    for (column, expr) in assignments {
        let value = match expr {
            ValueExpr::Placeholder => {
                let value = binder.at(next_arg)?;
                next_arg += 1;
                value
            }
            ValueExpr::Literal(literal) => literal,
        };
        set_values.insert(column, value);
    }

    let where_value = match where_expr {
        ValueExpr::Placeholder => binder.last()?,
        ValueExpr::Literal(literal) => literal,
    };

    Ok(Intent::update(
        table,
        set_values,
        Predicate::new(where_column, where_value),
    ))
}
