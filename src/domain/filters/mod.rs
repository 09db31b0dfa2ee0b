//! Filter declarations: kinds, specs, and the per-type registry.

mod kind;
mod registry;
mod scalar;
mod spec;
mod temporal;

pub use kind::{CoerceFn, CustomKind, FilterKind};
pub use registry::{FilterRegistry, ImportOptions};
pub use spec::{DefaultFn, DefaultValue, FilterOptions, FilterSpec};
