//! # Primary Group Resolution
//!
//! A migrated user may inherit several groups, but the target model
//! designates exactly one as primary. When the legacy scheme declares a
//! primary group outright, that declaration wins. Otherwise the primary is
//! derived: only memberships with no namespace restriction and no expiry
//! are considered, and the most senior of those (lowest source rank under
//! the ascending convention) is chosen.
//!
//! Applying the choice also swaps out the implicit default membership a
//! freshly created user record starts with — otherwise the user would
//! inherit both the explicit primary and `default` at once.

use crate::entity::{Entity, DEFAULT_GROUP};
use crate::names::standardize_name;
use crate::node::CanonicalNode;

/// One inherited-group membership considered for primary selection.
#[derive(Debug, Clone)]
pub struct PrimaryCandidate {
    /// Standardized group name.
    pub group: String,
    /// Source rank of the group under the ascending convention; lower is
    /// more senior. `i64::MAX` when the source never reported one.
    pub weight: i64,
    /// Whether the membership carries no namespace restriction.
    pub global: bool,
    /// Membership expiry, if any.
    pub expiry: Option<i64>,
}

/// Pick the single primary group for a user.
///
/// An explicit source-declared primary (standardized, non-empty) takes
/// precedence over the derived choice. Among derived candidates, only
/// global non-expiring memberships are eligible and the lowest weight
/// wins; ties keep the first one seen.
pub fn resolve_primary(
    explicit: Option<&str>,
    candidates: &[PrimaryCandidate],
) -> Option<String> {
    if let Some(name) = explicit {
        let standardized = standardize_name(name);
        if !standardized.is_empty() {
            return Some(standardized);
        }
    }

    let mut best: Option<&PrimaryCandidate> = None;
    for candidate in candidates
        .iter()
        .filter(|c| c.global && c.expiry.is_none())
    {
        match best {
            Some(current) if candidate.weight >= current.weight => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.group.clone())
}

/// Apply a resolved primary group to a user entity.
///
/// No-op (returns `false`) when the primary standardizes to `""` or to
/// `"default"`. Otherwise removes the implicit global `group.default`
/// membership, adds an inheritance node for the primary, and records the
/// primary-group designation on the entity.
pub fn apply_primary(entity: &mut Entity, primary: &str) -> bool {
    let primary = standardize_name(primary);
    if primary.is_empty() || primary == DEFAULT_GROUP {
        return false;
    }

    let implicit = CanonicalNode::inheritance_of(DEFAULT_GROUP);
    entity.remove_matching(|node| *node == implicit);
    entity.add_node(CanonicalNode::inheritance_of(&primary));
    entity.set_primary_group(&primary);
    true
}

// ============================================================================
// TESTS
// ============================================================================
