//! Coercion rules for date and date-time kinds.

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{format_description, Date, OffsetDateTime, PrimitiveDateTime};

use super::scalar::unexpected;
use crate::domain::validation::ErrorKind;
use crate::domain::value::TypedValue;

/// Check that a custom format description parses.
pub(crate) fn check_format(format: &str) -> Result<(), String> {
    format_description::parse(format)
        .map(|_| ())
        .map_err(|e| format!("invalid format '{}': {}", format, e))
}

pub(crate) fn date(raw: &Value, format: Option<&str>) -> Result<TypedValue, ErrorKind> {
    let s = raw.as_str().ok_or_else(|| unexpected("a date string", raw))?.trim();
    let parsed = match format {
        None => Date::parse(s, format_description!("[year]-[month]-[day]")),
        Some(format) => {
            let items = format_description::parse(format)
                .map_err(|e| ErrorKind::invalid(e.to_string()))?;
            Date::parse(s, &items)
        }
    };
    parsed
        .map(TypedValue::Date)
        .map_err(|e| ErrorKind::invalid(format!("'{}' is not a date: {}", s, e)))
}

/// Custom formats without an offset component are read as UTC.
pub(crate) fn date_time(raw: &Value, format: Option<&str>) -> Result<TypedValue, ErrorKind> {
    let s = raw
        .as_str()
        .ok_or_else(|| unexpected("a date-time string", raw))?
        .trim();
    let parsed = match format {
        None => OffsetDateTime::parse(s, &Rfc3339),
        Some(format) => {
            let items = format_description::parse(format)
                .map_err(|e| ErrorKind::invalid(e.to_string()))?;
            OffsetDateTime::parse(s, &items)
                .or_else(|_| PrimitiveDateTime::parse(s, &items).map(PrimitiveDateTime::assume_utc))
        }
    };
    parsed
        .map(TypedValue::DateTime)
        .map_err(|e| ErrorKind::invalid(format!("'{}' is not a date-time: {}", s, e)))
}
