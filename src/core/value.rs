use serde_json::{Map, Value};

/// A schemaless document-store row.
pub type Row = Map<String, Value>;

/// Column that carries a row's identifier.
pub const ID_COLUMN: &str = "id";

/// Text form of a scalar as a REST filter would carry it.
///
/// Strings are used verbatim (no surrounding quotes); everything else uses its JSON text.
pub fn filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality as a text-filtered store evaluates it.
///
/// `42` and `"42"` compare equal; `null` only matches `null`.
pub fn text_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (a, b) if a == b => true,
        (a, b) => filter_text(a) == filter_text(b),
    }
}

/// Identifier of a row, if it has one.
pub fn row_id(row: &Row) -> Option<Value> {
    row.get(ID_COLUMN).filter(|id| !id.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_eq_numbers_and_strings() {
        assert!(text_eq(&json!(42), &json!(42)));
        assert!(text_eq(&json!(42), &json!("42")));
        assert!(text_eq(&json!("admin"), &json!("admin")));
        assert!(text_eq(&json!(1.0), &json!(1)));
        assert!(!text_eq(&json!("admin"), &json!("Admin")));
        assert!(!text_eq(&json!(5), &json!("5.5")));
    }

    #[test]
    fn test_text_eq_null() {
        assert!(text_eq(&Value::Null, &Value::Null));
        assert!(!text_eq(&Value::Null, &json!("null")));
        assert!(!text_eq(&json!(0), &Value::Null));
    }

    #[test]
    fn test_row_id() {
        let row = json!({"id": 7, "name": "x"});
        assert_eq!(row_id(row.as_object().unwrap()), Some(json!(7)));

        let row = json!({"id": null});
        assert_eq!(row_id(row.as_object().unwrap()), None);
    }
}
