//! Typed values produced by cleaning.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::attributes::AttributeSet;

/// A value after successful coercion through its filter kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Boolean(bool),
    String(String),
    Symbol(String),
    Integer(i64),
    Float(f64),
    /// Canonical decimal text, kept as text so no precision is lost.
    Decimal(String),
    Date(Date),
    DateTime(OffsetDateTime),
    File(PathBuf),
    Array(Vec<Option<TypedValue>>),
    Hash(AttributeSet),
    /// Untyped passthrough (interface values, untyped array members).
    Json(Value),
}

impl TypedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// String content of string and symbol values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) | TypedValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of integer, float and decimal values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Integer(i) => Some(*i as f64),
            TypedValue::Float(f) => Some(*f),
            TypedValue::Decimal(d) => d.parse().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            TypedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<OffsetDateTime> {
        match self {
            TypedValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TypedValue::File(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Option<TypedValue>]> {
        match self {
            TypedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&AttributeSet> {
        match self {
            TypedValue::Hash(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            TypedValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Render back to JSON, e.g. for echoing cleaned inputs in an API body.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Boolean(b) => json!(b),
            TypedValue::String(s) | TypedValue::Symbol(s) | TypedValue::Decimal(s) => json!(s),
            TypedValue::Integer(i) => json!(i),
            TypedValue::Float(f) => json!(f),
            TypedValue::Date(d) => d
                .format(format_description!("[year]-[month]-[day]"))
                .map(Value::String)
                .unwrap_or(Value::Null),
            TypedValue::DateTime(dt) => dt
                .format(&Rfc3339)
                .map(Value::String)
                .unwrap_or(Value::Null),
            TypedValue::File(p) => json!(p.to_string_lossy()),
            TypedValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Value::Null, TypedValue::to_json))
                    .collect(),
            ),
            TypedValue::Hash(set) => set.to_json(),
            TypedValue::Json(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(TypedValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(TypedValue::Integer(5).as_i64(), Some(5));
        assert_eq!(TypedValue::Integer(5).as_f64(), Some(5.0));
        assert_eq!(TypedValue::Symbol("draft".into()).as_str(), Some("draft"));
        assert_eq!(TypedValue::Decimal("1.50".into()).as_f64(), Some(1.5));
        assert_eq!(TypedValue::String("x".into()).as_i64(), None);
    }

    #[test]
    fn test_to_json_temporal() {
        assert_eq!(TypedValue::Date(date!(2024-02-29)).to_json(), json!("2024-02-29"));
        assert_eq!(
            TypedValue::DateTime(datetime!(2024-01-02 03:04:05 UTC)).to_json(),
            json!("2024-01-02T03:04:05Z")
        );
    }

    #[test]
    fn test_to_json_array_keeps_holes() {
        let value = TypedValue::Array(vec![Some(TypedValue::Integer(1)), None]);
        assert_eq!(value.to_json(), json!([1, null]));
    }
}
