//! # Identity Resolution
//!
//! Maps legacy user identifier strings to stable identities.
//!
//! The chain is tried in order, first success wins:
//!
//! 1. canonical dashed UUID literal;
//! 2. undashed 32-hex-character UUID form;
//! 3. the external name→identity lookup service.
//!
//! Step 3 may be slow or blocking and may itself fail. If every step
//! fails, resolution fails with [`Error::IdentityNotFound`]; callers skip
//! that record and carry on — a single unresolvable identifier never
//! aborts a migration pass.

use uuid::Uuid;

use super::{parse_uuid_literal, Identity};
use crate::error::{Error, Result};

/// External name→identity lookup service.
///
/// Used as the last fallback when an identifier is not a UUID literal.
/// Implementations may block on network or disk.
pub trait NameLookup {
    /// Resolve a player name to its 128-bit identity key.
    fn lookup(&self, name: &str) -> Result<Option<Uuid>>;
}

/// A lookup that never finds anything.
///
/// For legacy schemes whose identifiers are always UUID literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl NameLookup for NoLookup {
    fn lookup(&self, _name: &str) -> Result<Option<Uuid>> {
        Ok(None)
    }
}

/// Resolves raw identifier strings through the fallback chain.
pub struct IdentityResolver<'a> {
    lookup: &'a dyn NameLookup,
}

impl<'a> IdentityResolver<'a> {
    /// Create a resolver backed by the given lookup service.
    pub fn new(lookup: &'a dyn NameLookup) -> Self {
        Self { lookup }
    }

    /// Resolve an identifier to a stable identity.
    ///
    /// When the identifier turns out to be a player name, it doubles as
    /// the display-name fallback for the resolved identity.
    pub fn resolve(&self, identifier: &str, display_name: Option<&str>) -> Result<Identity> {
        if let Some(uuid) = parse_uuid_literal(identifier) {
            return Ok(Identity::new(uuid, display_name));
        }

        match self.lookup.lookup(identifier) {
            Ok(Some(uuid)) => Ok(Identity::new(uuid, display_name.or(Some(identifier)))),
            Ok(None) => Err(Error::IdentityNotFound(identifier.to_string())),
            Err(err) => {
                tracing::warn!("name lookup failed for {identifier}: {err}");
                Err(Error::IdentityNotFound(identifier.to_string()))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct MapLookup(HashMap<String, Uuid>);

    impl NameLookup for MapLookup {
        fn lookup(&self, name: &str) -> Result<Option<Uuid>> {
            Ok(self.0.get(name).copied())
        }
    }

    struct BrokenLookup;

    impl NameLookup for BrokenLookup {
        fn lookup(&self, _name: &str) -> Result<Option<Uuid>> {
            Err(Error::NameLookup("service offline".into()))
        }
    }

    #[test]
    fn test_resolves_uuid_literals_without_lookup() {
        let resolver = IdentityResolver::new(&NoLookup);

        let dashed = resolver
            .resolve("069a79f4-44e9-4726-a5be-fca90e38aaf5", Some("Notch"))
            .unwrap();
        let undashed = resolver
            .resolve("069a79f444e94726a5befca90e38aaf5", None)
            .unwrap();

        assert_eq!(dashed, undashed);
        assert_eq!(dashed.name(), Some("Notch"));
    }

    #[test]
    fn test_falls_back_to_name_lookup() {
        let uuid = Uuid::new_v4();
        let lookup = MapLookup(HashMap::from([("Notch".to_string(), uuid)]));
        let resolver = IdentityResolver::new(&lookup);

        let identity = resolver.resolve("Notch", None).unwrap();
        assert_eq!(identity.uuid(), uuid);
        // The identifier itself becomes the display name.
        assert_eq!(identity.name(), Some("Notch"));
    }

    #[test]
    fn test_unknown_name_is_identity_not_found() {
        let resolver = IdentityResolver::new(&NoLookup);
        let err = resolver.resolve("Herobrine", None).unwrap_err();

        assert!(matches!(err, Error::IdentityNotFound(_)));
        assert!(err.is_entity_scoped());
    }

    #[test]
    fn test_lookup_failure_is_identity_not_found() {
        let resolver = IdentityResolver::new(&BrokenLookup);
        let err = resolver.resolve("Notch", None).unwrap_err();

        assert!(matches!(err, Error::IdentityNotFound(_)));
    }
}
