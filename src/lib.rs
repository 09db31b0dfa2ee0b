//! inputsieve: declarative typed input filters.
//!
//! Declare named, typed filters on a [`FilterRegistry`], then clean raw
//! string-keyed input against it. Cleaning yields an [`AttributeSet`] of typed
//! values plus an ordered [`ErrorCollection`]; business logic behind an
//! [`Interaction`] only runs when that collection is empty.
//!
//! ```
//! use inputsieve::{FilterKind, FilterOptions, FilterRegistry, TypedValue};
//! use serde_json::json;
//!
//! let mut filters = FilterRegistry::new();
//! filters
//!     .declare(FilterKind::integer(), &["required_count"], FilterOptions::new())?
//!     .declare(FilterKind::boolean(), &["flag"], FilterOptions::new().default(json!(false)))?;
//!
//! let raw = json!({"required_count": "5"});
//! let cleaned = filters.clean(raw.as_object().unwrap());
//! assert!(cleaned.valid());
//! assert_eq!(cleaned.attributes.get("required_count"), Some(&TypedValue::Integer(5)));
//! assert_eq!(cleaned.attributes.get("flag"), Some(&TypedValue::Boolean(false)));
//! # Ok::<(), inputsieve::FilterError>(())
//! ```

pub mod config;
pub mod domain;
pub mod service;

pub use domain::{
    AttributeSet, Cleaned, CleaningEngine, DefaultValue, ErrorCollection, ErrorKind, FilterError,
    FilterKind, FilterOptions, FilterRegistry, FilterSpec, ImportOptions, InputProcessor, Inputs,
    KeyPolicy, TypedValue, ValidationError,
};
pub use service::{Interaction, InvalidInteraction, Outcome};
