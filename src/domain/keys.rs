//! Key normalization and reserved-name policy.
//!
//! The same policy governs filter declaration and raw input keys, so a name
//! that can't be declared can't be smuggled in through the input mapping either.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Prefix reserved for internal machinery.
pub const DEFAULT_RESERVED_PREFIX: &str = "_interaction_";

/// Names that collide with the interaction surface.
pub const BUILTIN_RESERVED_NAMES: &[&str] = &[
    "errors", "execute", "filters", "given", "inputs", "result", "run", "valid",
];

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Check whether a string is a valid filter identifier.
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// Normalization and reservation rules for filter names and input keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    reserved_prefix: String,
    reserved_names: BTreeSet<String>,
    fold_case: bool,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            reserved_names: BUILTIN_RESERVED_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
            fold_case: true,
        }
    }
}

impl KeyPolicy {
    /// Create a policy with the built-in reserved names plus `extra`.
    pub fn new<I, S>(reserved_prefix: &str, extra: I, fold_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self {
            reserved_prefix: reserved_prefix.to_string(),
            fold_case,
            ..Self::default()
        };
        for name in extra {
            let normalized = policy.normalize(name.as_ref());
            policy.reserved_names.insert(normalized);
        }
        policy
    }

    /// Canonical form of a key: trimmed, one leading `:` dropped, and
    /// ASCII-lowercased when case folding is on.
    pub fn normalize(&self, key: &str) -> String {
        let key = key.trim();
        let key = key.strip_prefix(':').unwrap_or(key);
        if self.fold_case {
            key.to_ascii_lowercase()
        } else {
            key.to_string()
        }
    }

    /// Check a normalized key against the reserved prefix and names.
    pub fn is_reserved(&self, normalized: &str) -> bool {
        (!self.reserved_prefix.is_empty() && normalized.starts_with(&self.reserved_prefix))
            || self.reserved_names.contains(normalized)
    }

    pub fn reserved_prefix(&self) -> &str {
        &self.reserved_prefix
    }

    /// Reserved names in sorted order.
    pub fn reserved_names(&self) -> impl Iterator<Item = &str> {
        self.reserved_names.iter().map(String::as_str)
    }

    pub fn folds_case(&self) -> bool {
        self.fold_case
    }
}
