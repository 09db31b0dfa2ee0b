//! Coercion rules for scalar kinds.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::domain::validation::ErrorKind;
use crate::domain::value::TypedValue;

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("decimal pattern is valid"))
}

fn type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn unexpected(expected: &str, raw: &Value) -> ErrorKind {
    ErrorKind::invalid(format!("expected {}, got {}", expected, type_name(raw)))
}

pub(crate) fn boolean(raw: &Value) -> Result<TypedValue, ErrorKind> {
    match raw {
        Value::Bool(b) => Ok(TypedValue::Boolean(*b)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Ok(TypedValue::Boolean(true)),
            "false" | "0" | "off" => Ok(TypedValue::Boolean(false)),
            _ => Err(ErrorKind::invalid(format!("'{}' is not a boolean", s))),
        },
        other => Err(unexpected("a boolean", other)),
    }
}

pub(crate) fn string(raw: &Value, strip: bool) -> Result<TypedValue, ErrorKind> {
    match raw {
        Value::String(s) if strip => Ok(TypedValue::String(s.trim().to_string())),
        Value::String(s) => Ok(TypedValue::String(s.clone())),
        other => Err(unexpected("a string", other)),
    }
}

pub(crate) fn symbol(raw: &Value) -> Result<TypedValue, ErrorKind> {
    let s = raw.as_str().ok_or_else(|| unexpected("a symbol", raw))?;
    let s = s.trim();
    let s = s.strip_prefix(':').unwrap_or(s);
    if s.is_empty() {
        return Err(ErrorKind::invalid("empty symbol"));
    }
    Ok(TypedValue::Symbol(s.to_string()))
}

fn integer_from_number(n: &Number) -> Result<i64, ErrorKind> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(ErrorKind::invalid(format!("{} is out of range", n)));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(ErrorKind::invalid(format!("{} is not a whole number", n))),
    }
}

pub(crate) fn integer(raw: &Value, base: u32) -> Result<TypedValue, ErrorKind> {
    match raw {
        Value::Number(n) => integer_from_number(n).map(TypedValue::Integer),
        Value::String(s) => i64::from_str_radix(s.trim(), base)
            .map(TypedValue::Integer)
            .map_err(|e| ErrorKind::invalid(format!("'{}' is not an integer: {}", s, e))),
        other => Err(unexpected("an integer", other)),
    }
}

pub(crate) fn float(raw: &Value) -> Result<TypedValue, ErrorKind> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => return Err(unexpected("a float", other)),
    };
    match value {
        Some(f) if f.is_finite() => Ok(TypedValue::Float(f)),
        _ => Err(ErrorKind::invalid(format!("{} is not a finite number", raw))),
    }
}

pub(crate) fn decimal(raw: &Value) -> Result<TypedValue, ErrorKind> {
    match raw {
        Value::Number(n) => Ok(TypedValue::Decimal(n.to_string())),
        Value::String(s) => {
            let s = s.trim();
            if !decimal_pattern().is_match(s) {
                return Err(ErrorKind::invalid(format!("'{}' is not a decimal", s)));
            }
            Ok(TypedValue::Decimal(s.trim_start_matches('+').to_string()))
        }
        other => Err(unexpected("a decimal", other)),
    }
}

pub(crate) fn file(raw: &Value) -> Result<TypedValue, ErrorKind> {
    let path = raw.as_str().ok_or_else(|| unexpected("a file path", raw))?;
    if path.contains('\0') {
        return Err(ErrorKind::invalid("path contains null character"));
    }
    Ok(TypedValue::File(PathBuf::from(path)))
}
