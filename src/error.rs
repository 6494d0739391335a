//! # Error Handling
//!
//! This module provides the error types for the migration engine.
//!
//! ## Propagation Policy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PROPAGATION POLICY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Entity-scoped (skip, log, continue with the next record)              │
//! │  ├── IdentityNotFound   - no identity for a user identifier            │
//! │  ├── MalformedRecord    - legacy record missing required fields        │
//! │  ├── StoreWrite         - canonical store rejected a create/save       │
//! │  └── NameLookup         - the name-resolution collaborator failed      │
//! │                                                                         │
//! │  Silent (observable only by omission)                                  │
//! │  └── AlreadyExpired     - node expiry already in the past; dropped     │
//! │                                                                         │
//! │  Fatal (aborts the run before any processing starts)                   │
//! │  └── SourceUnavailable  - legacy source not loaded / refused access    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A migration pass is best-effort: one bad record never aborts the batch,
//! and there is no rollback. Re-running after fixing a source issue simply
//! re-derives the nodes; duplicates are absorbed by set semantics.

use thiserror::Error;

/// Result type alias for migration-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the migration engine
#[derive(Error, Debug)]
pub enum Error {
    /// No identity could be derived for a user identifier string
    #[error("unable to resolve an identity for user identifier: {0}")]
    IdentityNotFound(String),

    /// A node's resolved expiry is already in the past
    #[error("node expiry is already in the past")]
    AlreadyExpired,

    /// A legacy record is missing fields the engine needs
    #[error("malformed legacy record: {0}")]
    MalformedRecord(String),

    /// The canonical store rejected a create or save
    #[error("canonical store write failed: {0}")]
    StoreWrite(String),

    /// The external name-resolution service failed
    #[error("name lookup failed: {0}")]
    NameLookup(String),

    /// The legacy source is not loaded or refused bulk access
    #[error("legacy source unavailable: {0}")]
    SourceUnavailable(String),
}

impl Error {
    /// Check if this error is scoped to a single entity.
    ///
    /// Entity-scoped errors are caught by the driver, logged with enough
    /// context to identify the offending record, and the loop proceeds to
    /// the next entity. Anything else aborts the run.
    pub fn is_entity_scoped(&self) -> bool {
        !matches!(self, Error::SourceUnavailable(_))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_scoped_errors() {
        assert!(Error::IdentityNotFound("herobrine".into()).is_entity_scoped());
        assert!(Error::MalformedRecord("no name".into()).is_entity_scoped());
        assert!(Error::StoreWrite("disk full".into()).is_entity_scoped());
        assert!(Error::AlreadyExpired.is_entity_scoped());
        assert!(!Error::SourceUnavailable("plugin not loaded".into()).is_entity_scoped());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = Error::IdentityNotFound("Notch".into());
        assert!(err.to_string().contains("Notch"));
    }
}
