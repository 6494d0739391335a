//! # Canonical Nodes
//!
//! The target model's atomic unit of permission data.
//!
//! ## Node Anatomy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CANONICAL NODE                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────┬──────────────────────────────────────────────────────┐   │
//! │  │ key      │  "essentials.fly"     plain permission               │   │
//! │  │          │  "group.admin-team"   inheritance                    │   │
//! │  │          │  "prefix.13.[Admin]"  prefix at priority 13          │   │
//! │  │          │  "suffix.13.~"        suffix at priority 13          │   │
//! │  │          │  "meta.homes.5"       metadata pair                  │   │
//! │  │          │  "weight.13"          group weight marker            │   │
//! │  ├──────────┼──────────────────────────────────────────────────────┤   │
//! │  │ value    │  true / false (default true)                         │   │
//! │  ├──────────┼──────────────────────────────────────────────────────┤   │
//! │  │ contexts │  ordered set of namespace pairs; empty = global      │   │
//! │  ├──────────┼──────────────────────────────────────────────────────┤   │
//! │  │ expiry   │  optional absolute Unix timestamp; absent = forever  │   │
//! │  └──────────┴──────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two nodes are the same node iff the full (key, value, contexts, expiry)
//! tuple matches; inserting an identical tuple twice is a no-op. A node
//! whose expiry is already in the past must never be stored — the builder
//! refuses to produce it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time;

pub mod context;
pub mod parse;

pub use context::{ContextSet, SERVER_KEY, WORLD_KEY};
pub use parse::parse_node;

const INHERITANCE_PREFIX: &str = "group.";
const WEIGHT_PREFIX: &str = "weight.";

/// When a node stops applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// Permanent.
    #[default]
    Never,
    /// Lapses at an absolute Unix timestamp (seconds).
    At(i64),
    /// Lapses this many seconds after the node is built; resolved to an
    /// absolute instant at build time.
    After(i64),
}

impl Expiry {
    /// Map the legacy epoch encoding where `0` means "permanent".
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        if seconds == 0 {
            Expiry::Never
        } else {
            Expiry::At(seconds)
        }
    }
}

/// The atomic unit of canonical permission data.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CanonicalNode {
    key: String,
    value: bool,
    contexts: ContextSet,
    expiry: Option<i64>,
}

impl CanonicalNode {
    /// Start building a node for a plain permission key.
    pub fn builder(key: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(key.into())
    }

    /// Start building an inheritance (parent-group) node.
    pub fn inheritance(group: &str) -> NodeBuilder {
        NodeBuilder::new(format!("{INHERITANCE_PREFIX}{group}"))
    }

    /// Start building a prefix node at the given priority.
    pub fn prefix(priority: i64, text: &str) -> NodeBuilder {
        NodeBuilder::new(format!("prefix.{priority}.{text}"))
    }

    /// Start building a suffix node at the given priority.
    pub fn suffix(priority: i64, text: &str) -> NodeBuilder {
        NodeBuilder::new(format!("suffix.{priority}.{text}"))
    }

    /// Start building a metadata node.
    pub fn meta(key: &str, value: &str) -> NodeBuilder {
        NodeBuilder::new(format!("meta.{key}.{value}"))
    }

    /// A permanent, global inheritance node for the given group.
    ///
    /// The exact form used for implicit default membership and for
    /// primary-group links.
    pub fn inheritance_of(group: &str) -> CanonicalNode {
        CanonicalNode {
            key: format!("{INHERITANCE_PREFIX}{group}"),
            value: true,
            contexts: ContextSet::new(),
            expiry: None,
        }
    }

    /// A permanent, global weight marker node.
    pub fn weight_of(weight: i64) -> CanonicalNode {
        CanonicalNode {
            key: format!("{WEIGHT_PREFIX}{weight}"),
            value: true,
            contexts: ContextSet::new(),
            expiry: None,
        }
    }

    /// The node key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The boolean value.
    pub fn value(&self) -> bool {
        self.value
    }

    /// The namespace restrictions.
    pub fn contexts(&self) -> &ContextSet {
        &self.contexts
    }

    /// The absolute expiry instant, if any.
    pub fn expiry(&self) -> Option<i64> {
        self.expiry
    }

    /// Whether the node's expiry has already passed.
    pub fn has_expired(&self) -> bool {
        matches!(self.expiry, Some(at) if time::is_past(at))
    }

    /// Whether this is an inheritance node.
    pub fn is_inheritance(&self) -> bool {
        self.key.starts_with(INHERITANCE_PREFIX)
    }

    /// The parent group an inheritance node points at.
    pub fn inheritance_target(&self) -> Option<&str> {
        self.key.strip_prefix(INHERITANCE_PREFIX)
    }

    /// Whether this is a weight marker node.
    pub fn is_weight(&self) -> bool {
        self.key.starts_with(WEIGHT_PREFIX)
    }
}

impl fmt::Display for CanonicalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.key, self.value, self.contexts)?;
        if let Some(at) = self.expiry {
            write!(f, " until {at}")?;
        }
        Ok(())
    }
}

/// Builder attaching value, contexts, and expiry to a node key.
///
/// This is where every raw record ends up, whatever legacy shape it came
/// from: the builder filters global-sentinel context values, resolves
/// relative expiries against the clock, and refuses to produce a node
/// whose expiry already lies in the past.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    key: String,
    value: bool,
    contexts: ContextSet,
    expiry: Expiry,
}

impl NodeBuilder {
    fn new(key: String) -> Self {
        Self {
            key,
            value: true,
            contexts: ContextSet::new(),
            expiry: Expiry::Never,
        }
    }

    /// Set the boolean value (default `true`).
    pub fn value(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    /// Attach a namespace restriction. Global-sentinel values are ignored.
    pub fn context(mut self, key: &str, value: &str) -> Self {
        self.contexts.add(key, value);
        self
    }

    /// Attach an expiry.
    pub fn expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// Finalize the node.
    ///
    /// Fails with [`Error::AlreadyExpired`] when the resolved expiry is in
    /// the past — such a node must be dropped, never stored — and with
    /// [`Error::MalformedRecord`] on an empty key.
    pub fn build(self) -> Result<CanonicalNode> {
        if self.key.is_empty() {
            return Err(Error::MalformedRecord("empty node key".into()));
        }

        let expiry = match self.expiry {
            Expiry::Never => None,
            Expiry::At(at) => Some(at),
            Expiry::After(seconds) => Some(time::now_timestamp() + seconds),
        };

        if let Some(at) = expiry {
            if time::is_past(at) {
                return Err(Error::AlreadyExpired);
            }
        }

        Ok(CanonicalNode {
            key: self.key,
            value: self.value,
            contexts: self.contexts,
            expiry,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn far_future() -> i64 {
        time::now_timestamp() + 86_400
    }

    #[test]
    fn test_builder_defaults() {
        let node = CanonicalNode::builder("some.perm").build().unwrap();

        assert_eq!(node.key(), "some.perm");
        assert!(node.value());
        assert!(node.contexts().is_global());
        assert_eq!(node.expiry(), None);
    }

    #[test]
    fn test_sentinel_contexts_never_appear() {
        let node = CanonicalNode::builder("some.perm")
            .context(WORLD_KEY, "*")
            .context(SERVER_KEY, "global")
            .context(WORLD_KEY, "nether")
            .build()
            .unwrap();

        assert_eq!(node.contexts().len(), 1);
        assert!(node.contexts().contains(WORLD_KEY, "nether"));
    }

    #[test]
    fn test_expired_node_is_refused() {
        let result = CanonicalNode::builder("some.perm")
            .expiry(Expiry::At(1_000))
            .build();

        assert!(matches!(result, Err(Error::AlreadyExpired)));
    }

    #[test]
    fn test_relative_expiry_resolves_to_absolute() {
        let node = CanonicalNode::builder("some.perm")
            .expiry(Expiry::After(3_600))
            .build()
            .unwrap();

        let at = node.expiry().unwrap();
        assert!(at > time::now_timestamp());
        assert!(!node.has_expired());
    }

    #[test]
    fn test_epoch_zero_means_permanent() {
        assert_eq!(Expiry::from_epoch_seconds(0), Expiry::Never);
        assert_eq!(Expiry::from_epoch_seconds(42), Expiry::At(42));
    }

    #[test]
    fn test_empty_key_is_malformed() {
        let result = CanonicalNode::builder("").build();
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_inheritance_nodes() {
        let node = CanonicalNode::inheritance("admin-team").build().unwrap();

        assert!(node.is_inheritance());
        assert_eq!(node.inheritance_target(), Some("admin-team"));
        assert_eq!(node, CanonicalNode::inheritance_of("admin-team"));
    }

    #[test]
    fn test_weight_and_decoration_keys() {
        assert_eq!(CanonicalNode::weight_of(13).key(), "weight.13");
        assert!(CanonicalNode::weight_of(13).is_weight());

        let prefix = CanonicalNode::prefix(13, "[Admin]").build().unwrap();
        assert_eq!(prefix.key(), "prefix.13.[Admin]");

        let meta = CanonicalNode::meta("homes", "5").build().unwrap();
        assert_eq!(meta.key(), "meta.homes.5");
    }

    #[test]
    fn test_full_tuple_equality() {
        let base = CanonicalNode::builder("some.perm").build().unwrap();
        let negated = CanonicalNode::builder("some.perm")
            .value(false)
            .build()
            .unwrap();
        let scoped = CanonicalNode::builder("some.perm")
            .context(WORLD_KEY, "nether")
            .build()
            .unwrap();
        let timed = CanonicalNode::builder("some.perm")
            .expiry(Expiry::At(far_future()))
            .build()
            .unwrap();

        assert_ne!(base, negated);
        assert_ne!(base, scoped);
        assert_ne!(base, timed);
        assert_eq!(base, CanonicalNode::builder("some.perm").build().unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let node = CanonicalNode::builder("some.perm")
            .value(false)
            .context(WORLD_KEY, "nether")
            .expiry(Expiry::At(far_future()))
            .build()
            .unwrap();

        let json = serde_json::to_string(&node).unwrap();
        let back: CanonicalNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
