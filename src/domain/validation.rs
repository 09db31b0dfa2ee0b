//! Validation error collection.
//!
//! Every per-filter failure of a cleaning pass ends up here as a
//! `(name, kind)` pair, in filter declaration order. An empty collection is
//! the only signal the execution wrapper consults before running logic.

use std::fmt;

use serde::Serialize;

/// What went wrong with a single input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required filter with no default and no supplied value
    Missing,
    /// Supplied value (or evaluated default) failed kind coercion, or the key
    /// itself was rejected by the input processor
    InvalidValue { reason: String },
    /// A composite filter's nested pass failed; carries the nested errors
    InvalidNested { errors: ErrorCollection },
    /// Error added by business logic after cleaning succeeded
    Custom { message: String },
}

impl ErrorKind {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ErrorKind::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Stable identifier for the kind, suitable for API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::InvalidValue { .. } => "invalid_value",
            ErrorKind::InvalidNested { .. } => "invalid_nested",
            ErrorKind::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Missing => write!(f, "is required"),
            ErrorKind::InvalidValue { reason } => write!(f, "is invalid ({})", reason),
            ErrorKind::InvalidNested { errors } => {
                write!(f, "has invalid nested values: ")?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            ErrorKind::Custom { message } => write!(f, "{}", message),
        }
    }
}

/// A single `(name, kind)` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub name: String,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)
    }
}

/// Ordered collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    entries: Vec<ValidationError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error for `name`.
    pub fn add(&mut self, name: impl Into<String>, kind: ErrorKind) {
        self.entries.push(ValidationError {
            name: name.into(),
            kind,
        });
    }

    /// Append every entry of `other`, keeping its order.
    pub fn merge(&mut self, other: ErrorCollection) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no errors were recorded.
    pub fn valid(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.iter()
    }

    /// Errors recorded for `name`.
    pub fn on<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ErrorKind> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| &e.kind)
    }

    /// Names with at least one error, in recorded order (may repeat).
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// `(name, code)` pairs, the shape most callers surface verbatim.
    pub fn pairs(&self) -> Vec<(&str, &'static str)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.kind.code()))
            .collect()
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ErrorCollection {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_keeps_order() {
        let mut errors = ErrorCollection::new();
        errors.add("b", ErrorKind::Missing);
        errors.add("a", ErrorKind::invalid("not a number"));
        assert_eq!(errors.names(), vec!["b", "a"]);
        assert_eq!(errors.pairs(), vec![("b", "missing"), ("a", "invalid_value")]);
        assert!(!errors.valid());
    }

    #[test]
    fn test_on_filters_by_name() {
        let mut errors = ErrorCollection::new();
        errors.add("a", ErrorKind::Missing);
        errors.add("b", ErrorKind::Missing);
        errors.add("a", ErrorKind::invalid("x"));
        assert_eq!(errors.on("a").count(), 2);
        assert_eq!(errors.on("c").count(), 0);
    }

    #[test]
    fn test_display() {
        let mut nested = ErrorCollection::new();
        nested.add("zip", ErrorKind::Missing);
        let mut errors = ErrorCollection::new();
        errors.add("count", ErrorKind::invalid("not an integer"));
        errors.add("address", ErrorKind::InvalidNested { errors: nested });
        assert_eq!(
            errors.to_string(),
            "count is invalid (not an integer), address has invalid nested values: zip is required"
        );
    }

    #[test]
    fn test_serialize_shape() {
        let mut nested = ErrorCollection::new();
        nested.add("0", ErrorKind::Missing);
        let mut errors = ErrorCollection::new();
        errors.add("tags", ErrorKind::InvalidNested { errors: nested });
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            json!([
                {"name": "tags", "kind": "invalid_nested", "errors": [
                    {"name": "0", "kind": "missing"}
                ]}
            ])
        );
    }
}
