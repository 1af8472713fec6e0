use crate::core::BindingError;
use serde_json::Value;

/// Resolves `?` placeholders against the caller's ordered argument list.
pub struct ParameterBinder<'a> {
    args: &'a [Value],
}

impl<'a> ParameterBinder<'a> {
    pub fn new(args: &'a [Value]) -> Self {
        Self { args }
    }

    /// Argument at a fixed position.
    pub fn at(&self, index: usize) -> Result<Value, BindingError> {
        self.args
            .get(index)
            .cloned()
            .ok_or(BindingError::MissingArgument {
                index,
                supplied: self.args.len(),
            })
    }

    /// The last argument. UPDATE reserves it for the WHERE value.
    pub fn last(&self) -> Result<Value, BindingError> {
        self.args.last().cloned().ok_or(BindingError::MissingArgument {
            index: 0,
            supplied: 0,
        })
    }

    /// Fails unless exactly `expected` arguments were supplied.
    pub fn expect_count(&self, expected: usize) -> Result<(), BindingError> {
        if self.args.len() == expected {
            Ok(())
        } else {
            Err(BindingError::CountMismatch {
                expected,
                supplied: self.args.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positional_lookup() {
        let args = vec![json!("a"), json!(2)];
        let binder = ParameterBinder::new(&args);

        assert_eq!(binder.at(0).unwrap(), json!("a"));
        assert_eq!(binder.at(1).unwrap(), json!(2));
        assert_eq!(binder.last().unwrap(), json!(2));
        assert_eq!(
            binder.at(2),
            Err(BindingError::MissingArgument { index: 2, supplied: 2 })
        );
    }

    #[test]
    fn test_expect_count() {
        let args = vec![json!(1)];
        let binder = ParameterBinder::new(&args);

        assert!(binder.expect_count(1).is_ok());
        assert_eq!(
            binder.expect_count(3),
            Err(BindingError::CountMismatch { expected: 3, supplied: 1 })
        );
    }

    #[test]
    fn test_last_on_empty() {
        let binder = ParameterBinder::new(&[]);
        assert!(binder.last().is_err());
    }
}
