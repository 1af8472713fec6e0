use super::ast::Intent;
use super::binder::ParameterBinder;
use super::lexer::{Cursor, Tok, ValueExpr};
use crate::core::{ParseError, Result, Row};

/// `INSERT INTO <table> (<col>, ...) VALUES (<val-or-?>, ...)`
///
/// Placeholders bind by column position: the `?` in the third value slot takes the
/// third argument, whatever sits in the slots before it.
pub fn parse_insert(statement: &str, binder: &ParameterBinder<'_>) -> Result<Intent> {
    let mut cursor = Cursor::new(statement)?;
    cursor.expect_kw("INSERT")?;
    cursor.expect_kw("INTO")?;
    let table = cursor.parse_table_name()?;

    cursor.expect(&Tok::LParen)?;
    let columns = cursor.parse_comma_separated(|c| c.parse_identifier())?;
    cursor.expect(&Tok::RParen)?;

    cursor.expect_kw("VALUES")?;
    cursor.expect(&Tok::LParen)?;
    let exprs = cursor.parse_comma_separated(|c| c.parse_value_expr())?;
    cursor.expect(&Tok::RParen)?;
    cursor.expect_end()?;

    if columns.len() != exprs.len() {
        return Err(ParseError::ColumnValueMismatch {
            columns: columns.len(),
            values: exprs.len(),
        }
        .into());
    }

    let bound_positions = exprs
        .iter()
        .rposition(ValueExpr::is_placeholder)
        .map_or(0, |last| last + 1);
    binder.expect_count(bound_positions)?;

    let mut values = Row::new();
    for (index, (column, expr)) in columns.into_iter().zip(exprs).enumerate() {
        let value = match expr {
            ValueExpr::Placeholder => binder.at(index)?,
            ValueExpr::Literal(literal) => literal,
        };
        values.insert(column, value);
    }

    Ok(Intent::insert(table, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BindingError, ShimError};
    use crate::parser::ast::Verb;
    use serde_json::{Value, json};

    fn parse(sql: &str, args: &[Value]) -> Result<Intent> {
        parse_insert(sql, &ParameterBinder::new(args))
    }

    #[test]
    fn test_insert_binds_placeholders_in_order() {
        let intent = parse(
            "INSERT INTO categories (name, description, created_at) VALUES (?, ?, ?)",
            &[json!("Weddings"), Value::Null, json!("2024-01-01T00:00:00Z")],
        )
        .unwrap();

        assert_eq!(intent.verb, Verb::Insert);
        assert_eq!(intent.table, "categories");
        let values = intent.values.unwrap();
        assert_eq!(values["name"], json!("Weddings"));
        assert_eq!(values["description"], Value::Null);
        assert_eq!(values["created_at"], json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_insert_placeholder_takes_argument_at_column_index() {
        let intent = parse(
            "INSERT INTO shoots (status, title, priority) VALUES ('draft', ?, 3)",
            &[json!("ignored"), json!("Beach")],
        )
        .unwrap();

        let values = intent.values.unwrap();
        assert_eq!(values["status"], json!("draft"));
        assert_eq!(values["title"], json!("Beach"));
        assert_eq!(values["priority"], json!("3"));
    }

    #[test]
    fn test_insert_all_literals_takes_no_arguments() {
        let intent = parse("INSERT INTO tags (name) VALUES ('portrait');", &[]).unwrap();
        assert_eq!(intent.values.unwrap()["name"], json!("portrait"));
    }

    #[test]
    fn test_insert_column_value_mismatch() {
        let err = parse("INSERT INTO t (a, b) VALUES (?)", &[json!(1)]).unwrap_err();
        assert!(matches!(
            err,
            ShimError::Parse(ParseError::ColumnValueMismatch { columns: 2, values: 1 })
        ));
    }

    #[test]
    fn test_insert_argument_count_checked() {
        let err = parse("INSERT INTO t (a, b) VALUES (?, ?)", &[json!(1)]).unwrap_err();
        assert!(matches!(
            err,
            ShimError::Binding(BindingError::CountMismatch { expected: 2, supplied: 1 })
        ));
    }

    #[test]
    fn test_insert_without_column_list_is_rejected() {
        let err = parse("INSERT INTO t VALUES (?)", &[json!(1)]).unwrap_err();
        assert!(matches!(err, ShimError::Parse(ParseError::UnexpectedToken { .. })));
    }
}
