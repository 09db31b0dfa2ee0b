//! Filter kinds and kind-specific coercion.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::registry::FilterRegistry;
use super::spec::{DefaultValue, FilterOptions, FilterSpec};
use super::{scalar, temporal};
use crate::domain::engine::CleaningEngine;
use crate::domain::validation::{ErrorCollection, ErrorKind};
use crate::domain::value::TypedValue;

/// Signature of a user-supplied coercion hook.
pub type CoerceFn = dyn Fn(&Value) -> Result<TypedValue, String> + Send + Sync;

/// User-supplied coercion hook with a display name.
#[derive(Clone)]
pub struct CustomKind {
    name: String,
    coerce: Arc<CoerceFn>,
}

impl fmt::Debug for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomKind").field("name", &self.name).finish()
    }
}

/// The closed set of filter kinds.
#[derive(Debug, Clone)]
pub enum FilterKind {
    Boolean,
    String { strip: bool },
    Symbol,
    Integer { base: u32 },
    Float,
    Decimal,
    Date { format: Option<String> },
    DateTime { format: Option<String> },
    File,
    /// JSON object that must carry every listed member.
    Interface { methods: Vec<String> },
    /// JSON array; members cleaned through `of` when present.
    Array { of: Option<Box<FilterSpec>> },
    /// JSON object cleaned against a nested registry.
    Hash { filters: FilterRegistry, strip: bool },
    Custom(CustomKind),
}

impl FilterKind {
    pub fn boolean() -> Self {
        FilterKind::Boolean
    }

    /// String filter that trims surrounding whitespace.
    pub fn string() -> Self {
        FilterKind::String { strip: true }
    }

    pub fn symbol() -> Self {
        FilterKind::Symbol
    }

    pub fn integer() -> Self {
        FilterKind::Integer { base: 10 }
    }

    pub fn integer_with_base(base: u32) -> Self {
        FilterKind::Integer { base }
    }

    pub fn float() -> Self {
        FilterKind::Float
    }

    pub fn decimal() -> Self {
        FilterKind::Decimal
    }

    pub fn date() -> Self {
        FilterKind::Date { format: None }
    }

    pub fn date_with_format(format: impl Into<String>) -> Self {
        FilterKind::Date {
            format: Some(format.into()),
        }
    }

    pub fn date_time() -> Self {
        FilterKind::DateTime { format: None }
    }

    pub fn date_time_with_format(format: impl Into<String>) -> Self {
        FilterKind::DateTime {
            format: Some(format.into()),
        }
    }

    pub fn file() -> Self {
        FilterKind::File
    }

    pub fn interface<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterKind::Interface {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Array of untyped members.
    pub fn array() -> Self {
        FilterKind::Array { of: None }
    }

    /// Array whose members must all clean through `kind`.
    pub fn array_of(kind: FilterKind) -> Self {
        Self::array_of_spec(FilterSpec::new("element", kind, FilterOptions::new()))
    }

    /// Array with a full element spec, e.g. one that allows null members.
    pub fn array_of_spec(element: FilterSpec) -> Self {
        FilterKind::Array {
            of: Some(Box::new(element)),
        }
    }

    /// Hash cleaned against `filters`, dropping undeclared keys.
    pub fn hash(filters: FilterRegistry) -> Self {
        FilterKind::Hash {
            filters,
            strip: true,
        }
    }

    pub fn custom<F>(name: impl Into<String>, coerce: F) -> Self
    where
        F: Fn(&Value) -> Result<TypedValue, String> + Send + Sync + 'static,
    {
        FilterKind::Custom(CustomKind {
            name: name.into(),
            coerce: Arc::new(coerce),
        })
    }

    /// Kind name, for introspection by external tooling.
    pub fn name(&self) -> &str {
        match self {
            FilterKind::Boolean => "boolean",
            FilterKind::String { .. } => "string",
            FilterKind::Symbol => "symbol",
            FilterKind::Integer { .. } => "integer",
            FilterKind::Float => "float",
            FilterKind::Decimal => "decimal",
            FilterKind::Date { .. } => "date",
            FilterKind::DateTime { .. } => "date_time",
            FilterKind::File => "file",
            FilterKind::Interface { .. } => "interface",
            FilterKind::Array { .. } => "array",
            FilterKind::Hash { .. } => "hash",
            FilterKind::Custom(custom) => custom.name.as_str(),
        }
    }

    /// Validate kind options at declaration time.
    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            FilterKind::Integer { base } if !(2..=36).contains(base) => {
                Err(format!("integer base must be between 2 and 36, got {}", base))
            }
            FilterKind::Date {
                format: Some(format),
            }
            | FilterKind::DateTime {
                format: Some(format),
            } => temporal::check_format(format),
            FilterKind::Array { of: Some(element) } => match element.default() {
                None | Some(DefaultValue::Nil) => element.kind().check(),
                Some(_) => Err("array elements cannot have a default".to_string()),
            },
            FilterKind::Custom(custom) if custom.name.trim().is_empty() => {
                Err("custom kind needs a name".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Whether `raw` counts as "not supplied" for this kind.
    ///
    /// `null` always does; a blank string does for every kind that can't
    /// hold one.
    pub(crate) fn is_absent(&self, raw: &Value) -> bool {
        match raw {
            Value::Null => true,
            Value::String(s) => {
                !matches!(self, FilterKind::String { .. } | FilterKind::Symbol)
                    && s.trim().is_empty()
            }
            _ => false,
        }
    }

    /// Coerce a present raw value.
    pub(crate) fn coerce(&self, raw: &Value) -> Result<TypedValue, ErrorKind> {
        match self {
            FilterKind::Boolean => scalar::boolean(raw),
            FilterKind::String { strip } => scalar::string(raw, *strip),
            FilterKind::Symbol => scalar::symbol(raw),
            FilterKind::Integer { base } => scalar::integer(raw, *base),
            FilterKind::Float => scalar::float(raw),
            FilterKind::Decimal => scalar::decimal(raw),
            FilterKind::Date { format } => temporal::date(raw, format.as_deref()),
            FilterKind::DateTime { format } => temporal::date_time(raw, format.as_deref()),
            FilterKind::File => scalar::file(raw),
            FilterKind::Interface { methods } => coerce_interface(raw, methods),
            FilterKind::Array { of } => coerce_array(raw, of.as_deref()),
            FilterKind::Hash { filters, strip } => {
                let object = raw
                    .as_object()
                    .ok_or_else(|| scalar::unexpected("an object", raw))?;
                CleaningEngine::new(filters)
                    .clean_nested(object, *strip)
                    .map(TypedValue::Hash)
                    .map_err(|errors| ErrorKind::InvalidNested { errors })
            }
            FilterKind::Custom(custom) => (custom.coerce)(raw).map_err(ErrorKind::invalid),
        }
    }
}

fn coerce_interface(raw: &Value, methods: &[String]) -> Result<TypedValue, ErrorKind> {
    let object = raw
        .as_object()
        .ok_or_else(|| scalar::unexpected("an object", raw))?;
    let missing: Vec<&str> = methods
        .iter()
        .filter(|m| !object.contains_key(m.as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(ErrorKind::invalid(format!(
            "missing members: {}",
            missing.join(", ")
        )));
    }
    Ok(TypedValue::Json(raw.clone()))
}

fn coerce_array(raw: &Value, element: Option<&FilterSpec>) -> Result<TypedValue, ErrorKind> {
    let items = raw
        .as_array()
        .ok_or_else(|| scalar::unexpected("an array", raw))?;

    let Some(element) = element else {
        return Ok(TypedValue::Array(
            items
                .iter()
                .map(|item| (!item.is_null()).then(|| TypedValue::Json(item.clone())))
                .collect(),
        ));
    };

    let mut values = Vec::with_capacity(items.len());
    let mut errors = ErrorCollection::new();
    for (index, item) in items.iter().enumerate() {
        match element.clean(Some(item)) {
            Ok(value) => values.push(value),
            Err(kind) => errors.add(index.to_string(), kind),
        }
    }

    if errors.is_empty() {
        Ok(TypedValue::Array(values))
    } else {
        Err(ErrorKind::InvalidNested { errors })
    }
}
