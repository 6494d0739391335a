//! # Identities
//!
//! Stable identities for migrated users.
//!
//! ## Identifier Forms
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LEGACY IDENTIFIER FORMS                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────┬──────────────────────────────────────────────────┐   │
//! │  │ Dashed UUID  │  069a79f4-44e9-4726-a5be-fca90e38aaf5            │   │
//! │  ├──────────────┼──────────────────────────────────────────────────┤   │
//! │  │ Undashed     │  069a79f444e94726a5befca90e38aaf5  (32 hex)      │   │
//! │  ├──────────────┼──────────────────────────────────────────────────┤   │
//! │  │ Player name  │  Notch  (resolved through a lookup service)      │   │
//! │  └──────────────┴──────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whatever the input form, the result is one 128-bit key. Two identities
//! are equal iff their keys are equal; the display name is carried metadata
//! and never participates in equality or hashing.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod resolver;

/// A stable identity for one migrated user.
///
/// Produced once per legacy user record and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// The stable 128-bit key
    uuid: Uuid,
    /// Last-known display name, if the source had a usable one
    name: Option<String>,
}

impl Identity {
    /// Create an identity from a resolved key and an optional display name.
    ///
    /// The display name passes through [`sanitize_display_name`]: a name
    /// that itself reads as a UUID literal is discarded rather than stored.
    pub fn new(uuid: Uuid, name: Option<&str>) -> Self {
        Self {
            uuid,
            name: name.and_then(sanitize_display_name),
        }
    }

    /// The stable 128-bit key.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The last-known display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.uuid, name),
            None => write!(f, "{}", self.uuid),
        }
    }
}

/// Parse an identifier string as a UUID literal.
///
/// Accepts the canonical dashed form and the undashed 32-hex-character
/// form (parsed as two unsigned 64-bit halves). Anything else — including
/// a player name — yields `None`.
pub fn parse_uuid_literal(s: &str) -> Option<Uuid> {
    match s.len() {
        36 => Uuid::try_parse(s).ok(),
        32 => parse_undashed(s),
        _ => None,
    }
}

fn parse_undashed(s: &str) -> Option<Uuid> {
    if !s.is_ascii() {
        return None;
    }
    let high = u64::from_str_radix(&s[..16], 16).ok()?;
    let low = u64::from_str_radix(&s[16..], 16).ok()?;
    Some(Uuid::from_u64_pair(high, low))
}

/// Apply the display-name rule to a raw candidate name.
///
/// Several legacy schemes store the user's UUID string where a name should
/// be. A candidate that trims to empty or parses as a UUID literal is
/// discarded — a UUID string is never kept as a display name.
pub fn sanitize_display_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || parse_uuid_literal(trimmed).is_some() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
