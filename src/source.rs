//! # Legacy Sources
//!
//! The contract a legacy-scheme adapter implements, and the raw record
//! shapes it yields. The engine never touches a legacy plugin's internals;
//! an adapter walks its own scheme's structures and flattens them into
//! these records. Whatever reflection or private-field access a scheme
//! forces stays inside its adapter.
//!
//! Multi-namespace schemes (one record per world or server) may yield the
//! same group name or user identifier several times; the driver merges
//! those into a single entity before anything is written.

use crate::error::Result;
use crate::node::Expiry;
use crate::weight::RankConvention;

/// One raw permission string as a legacy scheme stored it.
#[derive(Debug, Clone, Default)]
pub struct RawPermission {
    /// The raw token, sign prefix and all. Empty tokens are skipped.
    pub node: String,
    /// Explicit boolean when the scheme stores one; `None` means the
    /// scheme default (granted).
    pub value: Option<bool>,
    /// Server namespace, when restricted.
    pub server: Option<String>,
    /// World namespace, when restricted.
    pub world: Option<String>,
    /// When the grant lapses.
    pub expiry: Expiry,
}

/// One inherited-group reference.
#[derive(Debug, Clone, Default)]
pub struct RawParent {
    /// Raw parent group name (standardized by the engine).
    pub group: String,
    /// Server namespace, when restricted.
    pub server: Option<String>,
    /// World namespace, when restricted.
    pub world: Option<String>,
    /// When the membership lapses.
    pub expiry: Expiry,
}

/// One metadata key/value pair.
#[derive(Debug, Clone, Default)]
pub struct RawOption {
    /// Option key; `prefix` and `suffix` get dedicated node forms.
    pub key: String,
    /// Option value.
    pub value: String,
    /// Server namespace, when restricted.
    pub server: Option<String>,
    /// World namespace, when restricted.
    pub world: Option<String>,
}

/// One group record as the legacy scheme holds it.
#[derive(Debug, Clone, Default)]
pub struct RawGroup {
    /// Raw group name (standardized by the engine).
    pub name: String,
    /// Source rank/priority number, when the scheme has one.
    pub rank: Option<i64>,
    /// Rank ladder the group belongs to, when the scheme has ladders.
    pub ladder: Option<String>,
    /// Flat permission strings.
    pub permissions: Vec<RawPermission>,
    /// Inherited groups.
    pub parents: Vec<RawParent>,
    /// Metadata pairs.
    pub options: Vec<RawOption>,
}

/// One user record as the legacy scheme holds it.
#[derive(Debug, Clone, Default)]
pub struct RawUser {
    /// Identifier string: dashed UUID, undashed UUID, or player name.
    pub identifier: String,
    /// Last-known display name, when the scheme stores one.
    pub display_name: Option<String>,
    /// Explicit primary group, when the scheme declares one.
    pub primary_group: Option<String>,
    /// Flat permission strings.
    pub permissions: Vec<RawPermission>,
    /// Inherited groups.
    pub parents: Vec<RawParent>,
    /// Metadata pairs.
    pub options: Vec<RawOption>,
}

/// One rank ladder, in promotion order.
#[derive(Debug, Clone, Default)]
pub struct RawTrack {
    /// Raw ladder name (standardized by the engine).
    pub name: String,
    /// Member groups, least senior first.
    pub groups: Vec<String>,
}

/// Contract a legacy-scheme adapter implements.
///
/// The engine drives one pass: `begin_bulk_read`, then `groups`, `tracks`,
/// and `users` in that order, then `end_bulk_read`. A failure from
/// `begin_bulk_read` or from an enumeration call is the one fatal
/// condition — it aborts the run before any entity is written.
pub trait LegacySource {
    /// Human-readable scheme name, for logs.
    fn name(&self) -> &str;

    /// Which priority convention the scheme's ranks follow.
    fn ranking(&self) -> RankConvention;

    /// The scheme's own named default group, if it has one. Occurrences
    /// are rewritten to the canonical `default` group.
    fn default_group(&self) -> Option<String> {
        None
    }

    /// Ask the source to suspend reentrant notification/callback machinery
    /// for the duration of the pass.
    fn begin_bulk_read(&self) -> Result<()> {
        Ok(())
    }

    /// Resume normal operation after the pass.
    fn end_bulk_read(&self) -> Result<()> {
        Ok(())
    }

    /// Every group record.
    fn groups(&self) -> Result<Vec<RawGroup>>;

    /// Every rank ladder.
    fn tracks(&self) -> Result<Vec<RawTrack>> {
        Ok(Vec::new())
    }

    /// Every user record.
    fn users(&self) -> Result<Vec<RawUser>>;
}
