//! Cleaned attribute container.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::filters::FilterRegistry;
use super::keys::KeyPolicy;
use super::value::TypedValue;

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: String,
    value: Option<TypedValue>,
    given: bool,
}

/// One slot per declared filter, in declaration order.
///
/// A slot holds `None` when the filter was optional and not supplied, or when
/// its cleaning failed (the failure is in the error collection instead).
///
/// Accessors normalize names under the registry's key policy, so `"Count"`
/// and `":count"` reach the same slot the registry does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    policy: Arc<KeyPolicy>,
    slots: Vec<Slot>,
    extras: Map<String, Value>,
}

impl AttributeSet {
    /// Empty slots for every filter in `registry`.
    pub fn for_registry(registry: &FilterRegistry) -> Self {
        Self {
            policy: registry.shared_policy(),
            slots: registry
                .names()
                .map(|name| Slot {
                    name: name.to_string(),
                    value: None,
                    given: false,
                })
                .collect(),
            extras: Map::new(),
        }
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        let name = self.policy.normalize(name);
        self.slots.iter().find(|s| s.name == name)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut Slot, FilterError> {
        let normalized = self.policy.normalize(name);
        self.slots
            .iter_mut()
            .find(|s| s.name == normalized)
            .ok_or_else(|| FilterError::UnknownAttribute(name.to_string()))
    }

    /// Getter. `None` for unset slots and undeclared names alike.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.slot(name).and_then(|s| s.value.as_ref())
    }

    /// Setter. Returns the previous value.
    pub fn set(
        &mut self,
        name: &str,
        value: TypedValue,
    ) -> Result<Option<TypedValue>, FilterError> {
        Ok(self.slot_mut(name)?.value.replace(value))
    }

    /// Clear a slot. Returns the previous value.
    pub fn unset(&mut self, name: &str) -> Result<Option<TypedValue>, FilterError> {
        Ok(self.slot_mut(name)?.value.take())
    }

    /// The `name?` predicate: true iff the slot holds a value.
    pub fn present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True iff the caller supplied the key, even as `null`.
    pub fn given(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|s| s.given)
    }

    pub(crate) fn mark_given(&mut self, name: &str) {
        if let Ok(slot) = self.slot_mut(name) {
            slot.given = true;
        }
    }

    pub(crate) fn fill(&mut self, name: &str, value: Option<TypedValue>) {
        if let Ok(slot) = self.slot_mut(name) {
            slot.value = value;
        }
    }

    pub(crate) fn set_extras(&mut self, extras: Map<String, Value>) {
        self.extras = extras;
    }

    /// Declared names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&TypedValue>)> {
        self.slots.iter().map(|s| (s.name.as_str(), s.value.as_ref()))
    }

    /// Undeclared keys kept by a non-stripping hash filter.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// JSON object of all slots (unset as `null`) plus any extras.
    pub fn to_json(&self) -> Value {
        let mut object = self.extras.clone();
        for slot in &self.slots {
            let value = slot.value.as_ref().map_or(Value::Null, TypedValue::to_json);
            object.insert(slot.name.clone(), value);
        }
        Value::Object(object)
    }
}
