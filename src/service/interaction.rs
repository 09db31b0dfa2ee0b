//! Execution wrapper: clean inputs, then run business logic only if valid.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{AttributeSet, ErrorCollection, FilterRegistry};

/// Raised by [`Interaction::run_or_raise`] when inputs or logic fail.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("interaction failed: {errors}")]
pub struct InvalidInteraction {
    pub errors: ErrorCollection,
}

/// Result of [`Interaction::run`].
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// Cleaned inputs (partially filled when invalid)
    pub inputs: AttributeSet,
    /// Business-logic result, present only when everything succeeded
    pub result: Option<T>,
    pub errors: ErrorCollection,
}

impl<T> Outcome<T> {
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `Result`, carrying the whole error collection on failure.
    pub fn into_result(self) -> Result<T, InvalidInteraction> {
        match self.result {
            Some(result) if self.errors.is_empty() => Ok(result),
            _ => Err(InvalidInteraction {
                errors: self.errors,
            }),
        }
    }
}

/// A unit of business logic guarded by declared filters.
pub trait Interaction {
    type Output;

    /// Filters every invocation is cleaned against.
    fn filters(&self) -> &FilterRegistry;

    /// Business logic. Only called with a fully valid attribute set.
    ///
    /// Errors returned here (typically [`ErrorKind::Custom`](crate::ErrorKind::Custom))
    /// end up in the outcome like validation errors do.
    fn execute(&self, inputs: &AttributeSet) -> Result<Self::Output, ErrorCollection>;

    /// Clean `raw`; execute only when there are no errors.
    fn run(&self, raw: &Map<String, Value>) -> Outcome<Self::Output> {
        let cleaned = self.filters().clean(raw);
        if !cleaned.valid() {
            info!("Inputs invalid: {}", cleaned.errors);
            return Outcome {
                inputs: cleaned.attributes,
                result: None,
                errors: cleaned.errors,
            };
        }

        debug!("Inputs valid, executing");
        match self.execute(&cleaned.attributes) {
            Ok(result) => Outcome {
                inputs: cleaned.attributes,
                result: Some(result),
                errors: ErrorCollection::new(),
            },
            Err(errors) => {
                info!("Execution failed: {}", errors);
                Outcome {
                    inputs: cleaned.attributes,
                    result: None,
                    errors,
                }
            }
        }
    }

    /// Like [`run`](Self::run), but a non-empty error collection becomes an error.
    fn run_or_raise(&self, raw: &Map<String, Value>) -> Result<Self::Output, InvalidInteraction> {
        self.run(raw).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, FilterKind, FilterOptions};
    use serde_json::json;
    use std::cell::Cell;

    struct Divide {
        filters: FilterRegistry,
        executed: Cell<usize>,
    }

    impl Divide {
        fn new() -> Self {
            let mut filters = FilterRegistry::new();
            filters
                .declare(FilterKind::integer(), &["a", "b"], FilterOptions::new())
                .unwrap();
            Self {
                filters,
                executed: Cell::new(0),
            }
        }
    }

    impl Interaction for Divide {
        type Output = i64;

        fn filters(&self) -> &FilterRegistry {
            &self.filters
        }

        fn execute(&self, inputs: &AttributeSet) -> Result<i64, ErrorCollection> {
            self.executed.set(self.executed.get() + 1);
            let a = inputs.get("a").and_then(|v| v.as_i64()).unwrap_or_default();
            let b = inputs.get("b").and_then(|v| v.as_i64()).unwrap_or_default();
            if b == 0 {
                let mut errors = ErrorCollection::new();
                errors.add(
                    "b",
                    ErrorKind::Custom {
                        message: "must not be zero".into(),
                    },
                );
                return Err(errors);
            }
            Ok(a / b)
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_run_valid() {
        let divide = Divide::new();
        let outcome = divide.run(&map(json!({"a": "9", "b": 3})));
        assert!(outcome.valid());
        assert_eq!(outcome.result, Some(3));
        assert_eq!(divide.executed.get(), 1);
    }

    #[test]
    fn test_run_invalid_skips_execute() {
        let divide = Divide::new();
        let outcome = divide.run(&map(json!({"a": "x"})));
        assert!(!outcome.valid());
        assert_eq!(outcome.result, None);
        assert_eq!(outcome.errors.pairs(), vec![("a", "invalid_value"), ("b", "missing")]);
        assert_eq!(divide.executed.get(), 0);
    }

    #[test]
    fn test_execute_errors_surface() {
        let divide = Divide::new();
        let outcome = divide.run(&map(json!({"a": 1, "b": 0})));
        assert_eq!(outcome.errors.pairs(), vec![("b", "custom")]);
        assert_eq!(outcome.result, None);
    }

    #[test]
    fn test_run_or_raise() {
        let divide = Divide::new();
        assert_eq!(divide.run_or_raise(&map(json!({"a": 8, "b": 2}))), Ok(4));
        let err = divide.run_or_raise(&map(json!({}))).unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.to_string(), "interaction failed: a is required, b is required");
    }
}
