//! Filter specifications and declaration options.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::kind::FilterKind;
use crate::domain::error::FilterError;
use crate::domain::validation::ErrorKind;
use crate::domain::value::TypedValue;

/// Signature of a deferred default.
pub type DefaultFn = dyn Fn() -> Value + Send + Sync;

/// Default for a filter whose key is absent.
#[derive(Clone)]
pub enum DefaultValue {
    /// Optional with no value
    Nil,
    /// Fixed raw value, cleaned like a supplied one
    Value(Value),
    /// Evaluated only when the key is absent, then cleaned
    Lazy(Arc<DefaultFn>),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Nil => write!(f, "Nil"),
            DefaultValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DefaultValue::Lazy(_) => write!(f, "Lazy(..)"),
        }
    }
}

/// Options accepted when declaring a filter.
///
/// A filter is required unless one of the default setters is used.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    default: Option<DefaultValue>,
    desc: Option<String>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self {
            default: None,
            desc: None,
        }
    }

    /// Fixed default, cleaned through the filter's kind.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(match value {
            Value::Null => DefaultValue::Nil,
            value => DefaultValue::Value(value),
        });
        self
    }

    /// Deferred default, evaluated only when the key is absent.
    pub fn default_with<F>(mut self, thunk: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Lazy(Arc::new(thunk)));
        self
    }

    /// Optional with no default value.
    pub fn optional(mut self) -> Self {
        self.default = Some(DefaultValue::Nil);
        self
    }

    /// Free-form description, for documentation tooling.
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

/// A declared, named, typed input.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    name: String,
    kind: FilterKind,
    default: Option<DefaultValue>,
    desc: Option<String>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, kind: FilterKind, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            kind,
            default: options.default,
            desc: options.desc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Required filters fail with a missing-value error when absent.
    pub fn required(&self) -> bool {
        self.default.is_none()
    }

    /// Same filter under another name.
    pub(crate) fn renamed(&self, name: String) -> FilterSpec {
        FilterSpec {
            name,
            ..self.clone()
        }
    }

    /// Declaration-time checks: kind options and fixed defaults.
    pub(crate) fn check(&self) -> Result<(), FilterError> {
        self.kind
            .check()
            .map_err(|reason| FilterError::invalid_filter(&self.name, reason))?;

        if let Some(DefaultValue::Value(value)) = &self.default {
            if !self.kind.is_absent(value) {
                self.kind
                    .coerce(value)
                    .map_err(|kind| FilterError::InvalidDefault {
                        name: self.name.clone(),
                        reason: kind.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Clean one raw value. `None` means the key was not supplied.
    ///
    /// `Ok(None)` is an optional filter resolving to no value.
    pub fn clean(&self, raw: Option<&Value>) -> Result<Option<TypedValue>, ErrorKind> {
        match raw.filter(|v| !self.kind.is_absent(v)) {
            Some(value) => self.kind.coerce(value).map(Some),
            None => self.clean_default(),
        }
    }

    fn clean_default(&self) -> Result<Option<TypedValue>, ErrorKind> {
        let value = match &self.default {
            None => return Err(ErrorKind::Missing),
            Some(DefaultValue::Nil) => return Ok(None),
            Some(DefaultValue::Value(value)) => value.clone(),
            Some(DefaultValue::Lazy(thunk)) => thunk(),
        };

        if self.kind.is_absent(&value) {
            return Ok(None);
        }
        self.kind.coerce(&value).map(Some).map_err(|kind| match kind {
            ErrorKind::InvalidValue { reason } => ErrorKind::InvalidValue {
                reason: format!("default {}", reason),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_required_without_default() {
        let spec = FilterSpec::new("count", FilterKind::integer(), FilterOptions::new());
        assert!(spec.required());
        assert_eq!(spec.clean(None), Err(ErrorKind::Missing));
        assert_eq!(spec.clean(Some(&Value::Null)), Err(ErrorKind::Missing));
        assert_eq!(spec.clean(Some(&json!(""))), Err(ErrorKind::Missing));
    }

    #[test]
    fn test_fixed_default_is_cleaned() {
        let spec = FilterSpec::new(
            "count",
            FilterKind::integer(),
            FilterOptions::new().default(json!("7")),
        );
        assert!(!spec.required());
        assert_eq!(spec.clean(None), Ok(Some(TypedValue::Integer(7))));
        assert_eq!(spec.clean(Some(&json!(2))), Ok(Some(TypedValue::Integer(2))));
    }

    #[test]
    fn test_null_default_means_optional() {
        let spec = FilterSpec::new(
            "note",
            FilterKind::string(),
            FilterOptions::new().default(Value::Null),
        );
        assert!(!spec.required());
        assert_eq!(spec.clean(None), Ok(None));
    }

    #[test]
    fn test_lazy_default_only_runs_when_absent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = FilterSpec::new(
            "flag",
            FilterKind::boolean(),
            FilterOptions::new().default_with(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                json!(true)
            }),
        );
        assert_eq!(spec.clean(Some(&json!(false))), Ok(Some(TypedValue::Boolean(false))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(spec.clean(None), Ok(Some(TypedValue::Boolean(true))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_default_of_wrong_shape_is_invalid() {
        let spec = FilterSpec::new(
            "count",
            FilterKind::integer(),
            FilterOptions::new().default_with(|| json!("many")),
        );
        let err = spec.clean(None).unwrap_err();
        assert_eq!(err.code(), "invalid_value");
        assert!(err.to_string().contains("default"));
    }

    #[test]
    fn test_check_rejects_bad_fixed_default() {
        let spec = FilterSpec::new(
            "flag",
            FilterKind::boolean(),
            FilterOptions::new().default(json!("maybe")),
        );
        assert!(matches!(spec.check(), Err(FilterError::InvalidDefault { .. })));
    }

    #[test]
    fn test_desc() {
        let spec = FilterSpec::new(
            "count",
            FilterKind::integer(),
            FilterOptions::new().desc("how many"),
        );
        assert_eq!(spec.desc(), Some("how many"));
    }
}
