//! Raw input pre-pass: reserved-key guard and key normalization.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tracing::warn;

use super::keys::KeyPolicy;
use super::validation::{ErrorCollection, ErrorKind};

/// Raw values keyed by normalized name.
///
/// When several raw keys collapse onto one name the last one wins and the
/// name is marked ambiguous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, Value>,
    ambiguous: BTreeSet<String>,
}

impl Inputs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// True if more than one raw key normalized to `name`.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains(name)
    }

    /// Entries whose names are not in `declared`.
    pub(crate) fn undeclared<'a>(
        &'a self,
        declared: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.values
            .iter()
            .filter(move |(name, _)| !declared.contains(&name.as_str()))
    }
}

/// Pre-pass over a raw mapping, run before any filter coercion.
pub struct InputProcessor<'a> {
    policy: &'a KeyPolicy,
}

impl<'a> InputProcessor<'a> {
    pub fn new(policy: &'a KeyPolicy) -> Self {
        Self { policy }
    }

    /// Reject reserved keys, then normalize.
    ///
    /// On rejection the collection holds one invalid-value entry per
    /// offending key, attributed to the key as the caller wrote it.
    pub fn process(&self, raw: &Map<String, Value>) -> Result<Inputs, ErrorCollection> {
        let mut errors = ErrorCollection::new();
        for key in raw.keys() {
            if self.policy.is_reserved(&self.policy.normalize(key)) {
                warn!("Rejected reserved input key '{}'", key);
                errors.add(key.clone(), ErrorKind::invalid("reserved key"));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.normalize(raw))
    }

    /// Normalize keys without the reserved guard (used for nested hashes).
    ///
    /// Collisions are only recorded here; whether one matters depends on
    /// whether a filter is declared under that name.
    pub fn normalize(&self, raw: &Map<String, Value>) -> Inputs {
        let mut inputs = Inputs::default();
        for (key, value) in raw {
            let name = self.policy.normalize(key);
            if inputs.values.insert(name.clone(), value.clone()).is_some() {
                inputs.ambiguous.insert(name);
            }
        }
        inputs
    }
}
