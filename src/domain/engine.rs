//! Per-invocation cleaning pass.
//!
//! Every filter is cleaned in declaration order. A failing filter records an
//! error and the pass moves on, so one invocation reports every problem.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::attributes::AttributeSet;
use super::filters::FilterRegistry;
use super::input::{InputProcessor, Inputs};
use super::validation::{ErrorCollection, ErrorKind};

/// Result of a cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub attributes: AttributeSet,
    pub errors: ErrorCollection,
}

impl Cleaned {
    /// The gate for running business logic.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs a registry's filters over raw input.
pub struct CleaningEngine<'a> {
    registry: &'a FilterRegistry,
}

impl<'a> CleaningEngine<'a> {
    pub fn new(registry: &'a FilterRegistry) -> Self {
        Self { registry }
    }

    /// Top-level pass: reserved-key guard, then every filter.
    ///
    /// When the guard rejects the mapping no filter runs and every attribute
    /// stays unset.
    pub fn clean(&self, raw: &Map<String, Value>) -> Cleaned {
        let mut attributes = AttributeSet::for_registry(self.registry);
        let inputs = match InputProcessor::new(self.registry.policy()).process(raw) {
            Ok(inputs) => inputs,
            Err(errors) => return Cleaned { attributes, errors },
        };
        let errors = self.clean_inputs(&inputs, &mut attributes);
        debug!(
            "Cleaned {} filters with {} errors",
            self.registry.len(),
            errors.len()
        );
        Cleaned { attributes, errors }
    }

    /// Nested pass for hash filters. Undeclared keys are kept as extras
    /// unless `strip` is set.
    pub(crate) fn clean_nested(
        &self,
        raw: &Map<String, Value>,
        strip: bool,
    ) -> Result<AttributeSet, ErrorCollection> {
        let inputs = InputProcessor::new(self.registry.policy()).normalize(raw);
        let mut attributes = AttributeSet::for_registry(self.registry);
        let errors = self.clean_inputs(&inputs, &mut attributes);
        if !errors.is_empty() {
            return Err(errors);
        }
        if !strip {
            let declared: Vec<&str> = self.registry.names().collect();
            let extras = inputs
                .undeclared(&declared)
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            attributes.set_extras(extras);
        }
        Ok(attributes)
    }

    fn clean_inputs(&self, inputs: &Inputs, attributes: &mut AttributeSet) -> ErrorCollection {
        let mut errors = ErrorCollection::new();
        for spec in self.registry.filters() {
            let raw = inputs.get(spec.name());
            if raw.is_some() {
                attributes.mark_given(spec.name());
            }
            if inputs.is_ambiguous(spec.name()) {
                warn!("Ambiguous input key '{}'", spec.name());
                errors.add(spec.name(), ErrorKind::invalid("ambiguous key"));
                continue;
            }
            match spec.clean(raw) {
                Ok(value) => attributes.fill(spec.name(), value),
                Err(kind) => {
                    debug!("Filter '{}' failed: {}", spec.name(), kind);
                    errors.add(spec.name(), kind);
                }
            }
        }
        errors
    }
}
