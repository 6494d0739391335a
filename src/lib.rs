//! # Permshift Core
//!
//! A migration engine that reduces legacy permission-scheme data — flat
//! permission strings, per-world/per-server overrides, prefixes and
//! suffixes, metadata, rank ladders, expiring grants — to a single
//! canonical permission-node model, one finite snapshot per invocation.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PERMSHIFT CORE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐   │
//! │  │  Identity   │  │    Node     │  │   Weight    │  │   Primary    │   │
//! │  │             │  │             │  │             │  │              │   │
//! │  │ - UUID      │  │ - Parse     │  │ - Rank      │  │ - Candidates │   │
//! │  │   forms     │  │ - Contexts  │  │   schemes   │  │ - Default    │   │
//! │  │ - Lookup    │  │ - Expiry    │  │ - Bands     │  │   swap       │   │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘   │
//! │         │                │                │                │           │
//! │         └────────────────┴────────────────┴────────────────┘           │
//! │                                   │                                     │
//! │  ┌─────────────┐  ┌─────────────┐ │ ┌─────────────────────────────────┐│
//! │  │   Source    │  │   Store     │ │ │          Migrate                ││
//! │  │             │  │             │ │ │                                 ││
//! │  │ - Raw       │  │ - Entities  │◄┘ │ - Accumulate per entity         ││
//! │  │   records   │  │ - Tracks    │   │ - Groups → tracks → users       ││
//! │  │ - Bulk read │  │ - In-memory │   │ - Skip-and-continue failures    ││
//! │  └─────────────┘  └─────────────┘   └─────────────────────────────────┘│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire engine
//! - [`time`] - Clock helpers behind expiry checks
//! - [`names`] - Group/track name standardization
//! - [`identity`] - Stable identities and the resolution fallback chain
//! - [`node`] - Canonical nodes, contexts, raw token parsing
//! - [`weight`] - Rank-convention translation and weight bands
//! - [`primary`] - Primary-group selection and the default swap
//! - [`entity`] - Group/user node-set owners and tracks
//! - [`source`] - The legacy-scheme adapter contract
//! - [`store`] - The canonical store contract and in-memory reference
//! - [`report`] - Progress reporting sinks
//! - [`migrate`] - The migration driver
//!
//! ## A Minimal Pass
//!
//! ```ignore
//! use permshift_core::{
//!     MigrationConfig, MigrationSession, MemoryStore, NoLookup, TracingReporter,
//! };
//!
//! let store = MemoryStore::new();
//! let reporter = TracingReporter;
//! let session = MigrationSession::new(&store, &NoLookup, &reporter, MigrationConfig::default());
//! let summary = session.run(&adapter)?;
//! println!("migrated {} groups, {} users", summary.groups, summary.users);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod entity;
pub mod error;
pub mod identity;
pub mod migrate;
pub mod names;
pub mod node;
pub mod primary;
pub mod report;
pub mod source;
pub mod store;
/// Clock helpers behind expiry checks.
pub mod time;
pub mod weight;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use entity::{Entity, EntityId, Track, DEFAULT_GROUP};
pub use error::{Error, Result};
pub use identity::resolver::{IdentityResolver, NameLookup, NoLookup};
pub use identity::Identity;
pub use migrate::{MigrationSession, MigrationSummary};
pub use node::{parse_node, CanonicalNode, ContextSet, Expiry, NodeBuilder};
pub use report::{CollectingReporter, Reporter, TracingReporter};
pub use source::LegacySource;
pub use store::{CanonicalStore, MemoryStore};
pub use weight::{RankConvention, WeightScale};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tuning knobs for a migration pass.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Emit a progress line every this many processed items.
    pub progress_interval: usize,
    /// Drop server/world restrictions and migrate every record as global.
    pub collapse_namespaces: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            progress_interval: 500,
            collapse_namespaces: false,
        }
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the engine crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = MigrationConfig::default();
        assert_eq!(config.progress_interval, 500);
        assert!(!config.collapse_namespaces);
    }
}
