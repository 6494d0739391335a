//! # Namespace Contexts
//!
//! A context narrows where a node applies — `server=lobby`, `world=nether`.
//! An empty context set means the node is global. Legacy schemes encode
//! "no restriction" in several ways (empty string, `*`, `global`, `all`);
//! all of them are recognized as sentinels and the pair is omitted
//! entirely rather than stored.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Context key for the server namespace axis.
pub const SERVER_KEY: &str = "server";

/// Context key for the world namespace axis.
pub const WORLD_KEY: &str = "world";

/// Whether a raw context value means "no restriction on this axis".
pub fn is_global_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value == "*"
        || value.eq_ignore_ascii_case("global")
        || value.eq_ignore_ascii_case("all")
}

/// An ordered set of namespace restrictions.
///
/// Pairs are kept sorted so that two sets built from the same pairs in any
/// order compare equal — context equality is part of node deduplication.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ContextSet(BTreeSet<(String, String)>);

impl ContextSet {
    /// An empty (global) context set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a restriction. Keys are lowercased; a global-sentinel value is
    /// dropped, leaving that axis unrestricted.
    pub fn add(&mut self, key: &str, value: &str) {
        if is_global_sentinel(value) {
            return;
        }
        self.0
            .insert((key.trim().to_lowercase(), value.trim().to_string()));
    }

    /// Whether this set carries no restriction at all.
    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of restrictions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty (alias of [`ContextSet::is_global`]).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the given pair is present.
    pub fn contains(&self, key: &str, value: &str) -> bool {
        let key = key.trim().to_lowercase();
        self.0
            .iter()
            .any(|(k, v)| *k == key && v.as_str() == value.trim())
    }

    /// Iterate the pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ContextSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            return write!(f, "global");
        }
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_values_are_omitted() {
        let mut contexts = ContextSet::new();
        contexts.add(WORLD_KEY, "");
        contexts.add(WORLD_KEY, "*");
        contexts.add(SERVER_KEY, "global");
        contexts.add(SERVER_KEY, "ALL");

        assert!(contexts.is_global());
    }

    #[test]
    fn test_add_normalizes_keys() {
        let mut contexts = ContextSet::new();
        contexts.add("World", "nether");

        assert!(contexts.contains(WORLD_KEY, "nether"));
        assert_eq!(contexts.len(), 1);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut a = ContextSet::new();
        a.add(SERVER_KEY, "lobby");
        a.add(WORLD_KEY, "nether");

        let mut b = ContextSet::new();
        b.add(WORLD_KEY, "nether");
        b.add(SERVER_KEY, "lobby");

        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let mut contexts = ContextSet::new();
        assert_eq!(contexts.to_string(), "global");

        contexts.add(WORLD_KEY, "nether");
        contexts.add(SERVER_KEY, "lobby");
        assert_eq!(contexts.to_string(), "server=lobby, world=nether");
    }
}
