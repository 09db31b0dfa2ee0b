//! Per-type filter registry.
//!
//! A registry is built once (declare, inherit, import) and read-only
//! afterwards. Specs are held behind `Arc`, so inheriting or importing shares
//! them without rebuilding, while each registry owns its own ordering.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::kind::FilterKind;
use super::spec::{FilterOptions, FilterSpec};
use crate::domain::engine::{Cleaned, CleaningEngine};
use crate::domain::error::FilterError;
use crate::domain::keys::{is_identifier, KeyPolicy};

/// Allow/deny lists for [`FilterRegistry::import`].
///
/// `only` is applied first, then `except` on the result.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    only: Option<Vec<String>>,
    except: Vec<String>,
}

impl ImportOptions {
    /// Import every filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn except<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered mapping from filter name to spec.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    policy: Arc<KeyPolicy>,
    filters: Vec<Arc<FilterSpec>>,
}

impl FilterRegistry {
    /// Empty registry with the default key policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            filters: Vec::new(),
        }
    }

    /// Independent copy of `parent`, taken at this moment.
    ///
    /// Later declarations on either side are not seen by the other.
    pub fn inherit(parent: &FilterRegistry) -> Self {
        parent.clone()
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    pub(crate) fn shared_policy(&self) -> Arc<KeyPolicy> {
        Arc::clone(&self.policy)
    }

    /// Declare one filter per name, all sharing `kind` and `options`.
    ///
    /// Every name is checked before any is inserted, so a failing call leaves
    /// the registry untouched. Redeclaring a name replaces it in place.
    pub fn declare(
        &mut self,
        kind: FilterKind,
        names: &[&str],
        options: FilterOptions,
    ) -> Result<&mut Self, FilterError> {
        if names.is_empty() {
            return Err(FilterError::invalid_filter(
                "",
                format!("no names given for {} filter", kind.name()),
            ));
        }

        let mut specs = Vec::with_capacity(names.len());
        for raw_name in names {
            let name = self.checked_name(raw_name)?;
            let spec = FilterSpec::new(name, kind.clone(), options.clone());
            spec.check()?;
            specs.push(spec);
        }

        for spec in specs {
            debug!("Declared {} filter '{}'", spec.kind().name(), spec.name());
            self.insert(Arc::new(spec));
        }
        Ok(self)
    }

    fn checked_name(&self, raw_name: &str) -> Result<String, FilterError> {
        let name = self.policy.normalize(raw_name);
        if !is_identifier(&name) {
            return Err(FilterError::invalid_filter(raw_name, "not a valid identifier"));
        }
        if self.policy.is_reserved(&name) {
            return Err(FilterError::invalid_filter(raw_name, "name is reserved"));
        }
        Ok(name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.name() == name)
    }

    fn insert(&mut self, spec: Arc<FilterSpec>) {
        match self.position(spec.name()) {
            Some(index) => self.filters[index] = spec,
            None => self.filters.push(spec),
        }
    }

    /// Copy filters from `source`, filtered by `options`.
    ///
    /// Names are renormalized under this registry's policy; `only` and
    /// `except` match the renormalized names. Existing names are overwritten
    /// in place; new names are appended in source order. Returns the number
    /// of filters imported.
    pub fn import(
        &mut self,
        source: &FilterRegistry,
        options: &ImportOptions,
    ) -> Result<usize, FilterError> {
        let only: Option<Vec<String>> = options
            .only
            .as_ref()
            .map(|names| names.iter().map(|n| self.policy.normalize(n)).collect());
        let except: Vec<String> = options
            .except
            .iter()
            .map(|n| self.policy.normalize(n))
            .collect();

        let selected: Vec<(String, &Arc<FilterSpec>)> = source
            .filters
            .iter()
            .map(|f| (self.policy.normalize(f.name()), f))
            .filter(|(name, _)| only.as_ref().map_or(true, |only| only.contains(name)))
            .filter(|(name, _)| !except.contains(name))
            .collect();

        for (index, (name, spec)) in selected.iter().enumerate() {
            if !is_identifier(name) {
                return Err(FilterError::invalid_filter(spec.name(), "not a valid identifier"));
            }
            if self.policy.is_reserved(name) {
                return Err(FilterError::invalid_filter(spec.name(), "name is reserved"));
            }
            if selected[..index].iter().any(|(other, _)| other == name) {
                return Err(FilterError::invalid_filter(
                    spec.name(),
                    format!("collides with another imported filter as '{}'", name),
                ));
            }
        }

        let count = selected.len();
        for (name, spec) in selected {
            let spec = if name == spec.name() {
                Arc::clone(spec)
            } else {
                Arc::new(spec.renamed(name))
            };
            debug!("Imported {} filter '{}'", spec.kind().name(), spec.name());
            self.insert(spec);
        }
        Ok(count)
    }

    /// Remove a filter from this registry only.
    pub fn remove(&mut self, name: &str) -> Option<Arc<FilterSpec>> {
        let name = self.policy.normalize(name);
        self.position(&name).map(|index| self.filters.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&FilterSpec> {
        let name = self.policy.normalize(name);
        self.filters
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Specs in declaration order.
    pub fn filters(&self) -> impl Iterator<Item = &FilterSpec> {
        self.filters.iter().map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.name())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run a full cleaning pass over `raw`.
    pub fn clean(&self, raw: &Map<String, Value>) -> Cleaned {
        CleaningEngine::new(self).clean(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::domain::value::TypedValue;

    fn names(registry: &FilterRegistry) -> Vec<&str> {
        registry.names().collect()
    }

    #[test]
    fn test_declare_multiple_names() {
        let mut registry = FilterRegistry::new();
        registry
            .declare(FilterKind::integer(), &["x", ":Y"], FilterOptions::new())
            .unwrap();
        assert_eq!(names(&registry), vec!["x", "y"]);
        assert_eq!(registry.get("Y").unwrap().kind().name(), "integer");
    }

    #[test]
    fn test_declare_empty_names() {
        let mut registry = FilterRegistry::new();
        let err = registry
            .declare(FilterKind::integer(), &[], FilterOptions::new())
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilter { .. }));
    }

    #[test]
    fn test_declare_reserved_name_is_atomic() {
        let mut registry = FilterRegistry::new();
        let err = registry
            .declare(FilterKind::string(), &["title", "errors"], FilterOptions::new())
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidFilter {
                name: "errors".into(),
                reason: "name is reserved".into()
            }
        );
        assert!(registry.is_empty());

        assert!(registry
            .declare(FilterKind::string(), &["_interaction_x"], FilterOptions::new())
            .is_err());
    }

    #[test]
    fn test_declare_invalid_identifier() {
        let mut registry = FilterRegistry::new();
        assert!(registry
            .declare(FilterKind::string(), &["first-name"], FilterOptions::new())
            .is_err());
    }

    #[test]
    fn test_declare_bad_fixed_default() {
        let mut registry = FilterRegistry::new();
        let err = registry
            .declare(
                FilterKind::integer(),
                &["count"],
                FilterOptions::new().default(json!("lots")),
            )
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidDefault { .. }));
    }

    #[test]
    fn test_redeclare_replaces_in_place() {
        let mut registry = FilterRegistry::new();
        registry
            .declare(FilterKind::integer(), &["a", "b"], FilterOptions::new())
            .unwrap();
        registry
            .declare(FilterKind::string(), &["a"], FilterOptions::new())
            .unwrap();
        assert_eq!(names(&registry), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().kind().name(), "string");
    }

    #[test]
    fn test_inherit_isolation() {
        let mut parent = FilterRegistry::new();
        parent
            .declare(FilterKind::integer(), &["a"], FilterOptions::new())
            .unwrap();
        let mut child = FilterRegistry::inherit(&parent);
        child
            .declare(FilterKind::boolean(), &["x"], FilterOptions::new())
            .unwrap();
        child.remove("a");
        parent
            .declare(FilterKind::string(), &["late"], FilterOptions::new())
            .unwrap();

        assert_eq!(names(&parent), vec!["a", "late"]);
        assert_eq!(names(&child), vec!["x"]);
    }

    #[test]
    fn test_import_only_then_except() {
        let mut source = FilterRegistry::new();
        source
            .declare(FilterKind::integer(), &["a", "b", "c"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::new();
        let count = target
            .import(&source, &ImportOptions::all().only(["a", "b"]).except(["b"]))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(names(&target), vec!["a"]);
    }

    #[test]
    fn test_import_except_only() {
        let mut source = FilterRegistry::new();
        source
            .declare(FilterKind::integer(), &["a", "b", "c"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::new();
        target
            .import(&source, &ImportOptions::all().except([":B"]))
            .unwrap();
        assert_eq!(names(&target), vec!["a", "c"]);
    }

    #[test]
    fn test_import_overwrites_and_shares_specs() {
        let mut source = FilterRegistry::new();
        source
            .declare(FilterKind::string(), &["a"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::new();
        target
            .declare(FilterKind::integer(), &["z", "a"], FilterOptions::new())
            .unwrap();
        target.import(&source, &ImportOptions::all()).unwrap();

        assert_eq!(names(&target), vec!["z", "a"]);
        assert_eq!(target.get("a").unwrap().kind().name(), "string");
        assert!(std::ptr::eq(source.get("a").unwrap(), target.get("a").unwrap()));
    }

    #[test]
    fn test_import_into_child_leaves_parent_alone() {
        let mut parent = FilterRegistry::new();
        parent
            .declare(FilterKind::integer(), &["a"], FilterOptions::new())
            .unwrap();
        let mut other = FilterRegistry::new();
        other
            .declare(FilterKind::boolean(), &["a"], FilterOptions::new())
            .unwrap();

        let mut child = FilterRegistry::inherit(&parent);
        child.import(&other, &ImportOptions::all()).unwrap();

        assert_eq!(parent.get("a").unwrap().kind().name(), "integer");
        assert_eq!(child.get("a").unwrap().kind().name(), "boolean");
    }

    #[test]
    fn test_import_respects_target_reserved_names() {
        let mut source =
            FilterRegistry::with_policy(KeyPolicy::new("_p_", Vec::<String>::new(), true));
        source
            .declare(FilterKind::integer(), &["session"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::with_policy(KeyPolicy::new("_p_", ["session"], true));
        assert!(target.import(&source, &ImportOptions::all()).is_err());
        assert!(target.is_empty());
    }

    #[test]
    fn test_import_renormalizes_names_under_target_policy() {
        let mut source =
            FilterRegistry::with_policy(KeyPolicy::new("_p_", Vec::<String>::new(), false));
        source
            .declare(FilterKind::integer(), &["userId"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::new();
        target
            .import(&source, &ImportOptions::all().only(["USERID"]))
            .unwrap();

        assert_eq!(names(&target), vec!["userid"]);
        assert!(target.get("userId").is_some());
        assert_eq!(source.get("userId").unwrap().name(), "userId");

        let cleaned = target.clean(json!({"userId": 1}).as_object().unwrap());
        assert!(cleaned.valid());
        assert_eq!(cleaned.attributes.get("userId").and_then(TypedValue::as_i64), Some(1));
    }

    #[test]
    fn test_import_rejects_names_colliding_after_renormalizing() {
        let mut source =
            FilterRegistry::with_policy(KeyPolicy::new("_p_", Vec::<String>::new(), false));
        source
            .declare(FilterKind::integer(), &["userId", "userid"], FilterOptions::new())
            .unwrap();
        let mut target = FilterRegistry::new();
        let err = target.import(&source, &ImportOptions::all()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilter { ref name, .. } if name == "userid"));
        assert!(target.is_empty());
    }
}
