//! # Entities
//!
//! A migrated entity is either a group (keyed by standardized name) or a
//! user (keyed by stable identity). Each owns an unordered set of
//! canonical nodes with set semantics — no duplicates, value-based
//! equality — and a user additionally owns at most one designated
//! primary-group name.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::node::CanonicalNode;

/// Name of the implicit group every newly created user record inherits.
pub const DEFAULT_GROUP: &str = "default";

/// What an entity is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    /// A group, by standardized name.
    Group(String),
    /// A user, by stable identity.
    User(Identity),
}

/// A group or user together with its owned node set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    nodes: BTreeSet<CanonicalNode>,
    primary_group: Option<String>,
}

impl Entity {
    /// A new, empty group entity.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::Group(name.into()),
            nodes: BTreeSet::new(),
            primary_group: None,
        }
    }

    /// A new user entity with no nodes.
    pub fn user(identity: Identity) -> Self {
        Self {
            id: EntityId::User(identity),
            nodes: BTreeSet::new(),
            primary_group: None,
        }
    }

    /// A new user entity seeded with the implicit default-group
    /// membership — the state a canonical store gives a user it has never
    /// seen before.
    pub fn new_user_with_default(identity: Identity) -> Self {
        let mut entity = Self::user(identity);
        entity.nodes.insert(CanonicalNode::inheritance_of(DEFAULT_GROUP));
        entity
    }

    /// The entity's key.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// The group name, when this is a group.
    pub fn group_name(&self) -> Option<&str> {
        match &self.id {
            EntityId::Group(name) => Some(name),
            EntityId::User(_) => None,
        }
    }

    /// The identity, when this is a user.
    pub fn identity(&self) -> Option<&Identity> {
        match &self.id {
            EntityId::Group(_) => None,
            EntityId::User(identity) => Some(identity),
        }
    }

    /// Insert a node.
    ///
    /// Already-expired nodes are dropped, never stored; inserting an
    /// identical tuple twice is a no-op. Returns whether the set changed.
    pub fn add_node(&mut self, node: CanonicalNode) -> bool {
        if node.has_expired() {
            return false;
        }
        self.nodes.insert(node)
    }

    /// Remove every node matching the predicate.
    pub fn remove_matching(&mut self, predicate: impl Fn(&CanonicalNode) -> bool) {
        self.nodes.retain(|node| !predicate(node));
    }

    /// Replace any weight marker with the given weight.
    pub fn set_weight(&mut self, weight: i64) {
        self.remove_matching(|node| node.is_weight());
        self.nodes.insert(CanonicalNode::weight_of(weight));
    }

    /// Designate the primary group (users only, by convention).
    pub fn set_primary_group(&mut self, group: &str) {
        self.primary_group = Some(group.to_string());
    }

    /// The designated primary group, if any.
    pub fn primary_group(&self) -> Option<&str> {
        self.primary_group.as_deref()
    }

    /// The owned node set.
    pub fn nodes(&self) -> &BTreeSet<CanonicalNode> {
        &self.nodes
    }

    /// Whether the exact node is present.
    pub fn contains(&self, node: &CanonicalNode) -> bool {
        self.nodes.contains(node)
    }
}

/// An ordered promotion path of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    name: String,
    groups: Vec<String>,
}

impl Track {
    /// A new, empty track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// The track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove every group from the track.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Append a group to the end of the path; duplicates are skipped.
    pub fn append(&mut self, group: impl Into<String>) -> bool {
        let group = group.into();
        if self.groups.contains(&group) {
            return false;
        }
        self.groups.push(group);
        true
    }

    /// The groups, in promotion order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::node::{Expiry, WORLD_KEY};
    use crate::time;

    #[test]
    fn test_identical_tuples_collapse() {
        let mut group = Entity::group("admin-team");

        let node = CanonicalNode::builder("some.perm").build().unwrap();
        assert!(group.add_node(node.clone()));
        assert!(!group.add_node(node));
        assert_eq!(group.nodes().len(), 1);
    }

    #[test]
    fn test_differing_contexts_stay_distinct() {
        let mut group = Entity::group("admin-team");

        group.add_node(
            CanonicalNode::builder("some.perm")
                .context(WORLD_KEY, "nether")
                .build()
                .unwrap(),
        );
        group.add_node(
            CanonicalNode::builder("some.perm")
                .context(WORLD_KEY, "the-end")
                .build()
                .unwrap(),
        );

        assert_eq!(group.nodes().len(), 2);
    }

    #[test]
    fn test_expired_nodes_are_never_stored() {
        let mut group = Entity::group("admin-team");

        // Build while still live, then let the deadline pass before insert.
        let node = CanonicalNode::builder("some.perm")
            .expiry(Expiry::At(time::now_timestamp()))
            .build();

        // Building at the boundary already refuses; an expired node that
        // somehow reaches add_node is dropped too.
        if let Ok(node) = node {
            group.add_node(node);
        }
        assert!(group.nodes().iter().all(|n| !n.has_expired()));
    }

    #[test]
    fn test_set_weight_replaces_marker() {
        let mut group = Entity::group("admin-team");

        group.set_weight(10);
        group.set_weight(13);

        let weights: Vec<_> = group.nodes().iter().filter(|n| n.is_weight()).collect();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].key(), "weight.13");
    }

    #[test]
    fn test_new_user_starts_in_default_group() {
        let user = Entity::new_user_with_default(Identity::new(Uuid::new_v4(), None));
        assert!(user.contains(&CanonicalNode::inheritance_of(DEFAULT_GROUP)));
    }

    #[test]
    fn test_track_append_skips_duplicates() {
        let mut track = Track::new("staff");

        assert!(track.append("trainee"));
        assert!(track.append("mod"));
        assert!(!track.append("trainee"));

        assert_eq!(track.groups(), ["trainee", "mod"]);
    }
}
