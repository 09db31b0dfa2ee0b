//! Error types for inputsieve.

use thiserror::Error;

/// Declaration-time and programmer errors.
///
/// Validation failures on raw input are never reported through this type;
/// they are collected in an [`ErrorCollection`](super::ErrorCollection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Empty name set, malformed name, reserved name, or bad kind options
    #[error("invalid filter '{name}': {reason}")]
    InvalidFilter { name: String, reason: String },

    /// A fixed default that does not clean through its own kind
    #[error("invalid default for filter '{name}': {reason}")]
    InvalidDefault { name: String, reason: String },

    /// Accessor used with a name the registry never declared
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

impl FilterError {
    pub(crate) fn invalid_filter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidFilter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
