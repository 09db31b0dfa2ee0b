//! Domain layer containing the filtering and cleaning core.
//!
//! This module contains:
//! - Filter kinds, specs and the per-type registry
//! - Key policy (normalization, reserved names)
//! - Input pre-pass and the cleaning engine
//! - Cleaned attributes and the validation error collection
//! - Logger with rotation

pub mod attributes;
pub mod engine;
mod error;
pub mod filters;
pub mod input;
pub mod keys;
pub mod logger;
pub mod validation;
pub mod value;

pub use attributes::AttributeSet;
pub use engine::{Cleaned, CleaningEngine};
pub use error::FilterError;
pub use filters::{
    DefaultValue, FilterKind, FilterOptions, FilterRegistry, FilterSpec, ImportOptions,
};
pub use input::{InputProcessor, Inputs};
pub use keys::KeyPolicy;
pub use validation::{ErrorCollection, ErrorKind, ValidationError};
pub use value::TypedValue;
