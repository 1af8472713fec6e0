use super::ast::{Intent, Predicate};
use super::binder::ParameterBinder;
use super::lexer::{Cursor, ValueExpr};
use crate::core::Result;

/// Shared tail of DELETE and SELECT: `WHERE <col> = <val-or-?>`, bound to the first argument.
pub(crate) fn bind_where(
    column: String,
    expr: ValueExpr,
    binder: &ParameterBinder<'_>,
) -> Result<Predicate> {
    let value = match expr {
        ValueExpr::Placeholder => {
            binder.expect_count(1)?;
            binder.at(0)?
        }
        ValueExpr::Literal(literal) => {
            binder.expect_count(0)?;
            literal
        }
    };
    Ok(Predicate::new(column, value))
}

/// `DELETE FROM <table> WHERE <col> = ?`
pub fn parse_delete(statement: &str, binder: &ParameterBinder<'_>) -> Result<Intent> {
    let mut cursor = Cursor::new(statement)?;
    cursor.expect_kw("DELETE")?;
    cursor.expect_kw("FROM")?;
    let table = cursor.parse_table_name()?;
    cursor.expect_kw("WHERE")?;
    let (column, expr) = cursor.parse_equality()?;
    cursor.expect_end()?;

    let predicate = bind_where(column, expr, binder)?;
    Ok(Intent::delete(table, predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BindingError, ParseError, ShimError};
    use crate::parser::ast::Verb;
    use serde_json::json;

    #[test]
    fn test_delete_binds_first_argument() {
        let args = [json!(17)];
        let intent = parse_delete(
            "DELETE FROM bookings WHERE id = ?",
            &ParameterBinder::new(&args),
        )
        .unwrap();

        assert_eq!(intent.verb, Verb::Delete);
        assert_eq!(intent.table, "bookings");
        assert_eq!(intent.predicate, Some(Predicate::new("id", json!(17))));
    }

    #[test]
    fn test_delete_without_where_is_rejected() {
        let err = parse_delete("DELETE FROM bookings", &ParameterBinder::new(&[])).unwrap_err();
        assert!(matches!(err, ShimError::Parse(ParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_delete_missing_argument() {
        let err = parse_delete("DELETE FROM bookings WHERE id = ?", &ParameterBinder::new(&[]))
            .unwrap_err();
        assert!(matches!(
            err,
            ShimError::Binding(BindingError::CountMismatch { expected: 1, supplied: 0 })
        ));
    }
}
