//! # Canonical Store
//!
//! The target permission store, abstracted behind a trait. The engine
//! loads an entity, mutates its node set in memory, and hands it back to
//! `save`; persistence and querying belong to the store implementation.
//! Any call may fail — failures surface to the driver's per-entity error
//! handling, which skips the entity and carries on.
//!
//! [`MemoryStore`] is the in-process reference implementation: it backs
//! the engine's own tests and doubles as a dry-run target.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::entity::{Entity, EntityId, Track};
use crate::error::Result;
use crate::identity::Identity;

/// The target permission store.
pub trait CanonicalStore {
    /// Load the group, creating an empty record if absent.
    fn create_or_load_group(&self, name: &str) -> Result<Entity>;

    /// Load the user, seeding a brand-new record (implicit default-group
    /// membership) if absent.
    fn load_user(&self, identity: &Identity) -> Result<Entity>;

    /// Whether a group record exists.
    fn group_exists(&self, name: &str) -> bool;

    /// Persist a mutated entity.
    fn save(&self, entity: &Entity) -> Result<()>;

    /// Load the track, creating an empty one if absent.
    fn create_or_load_track(&self, name: &str) -> Result<Track>;

    /// Persist a mutated track.
    fn save_track(&self, track: &Track) -> Result<()>;
}

/// In-memory canonical store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    groups: HashMap<String, Entity>,
    users: HashMap<Uuid, Entity>,
    tracks: HashMap<String, Track>,
}

impl MemoryStore {
    /// A new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored group.
    pub fn group(&self, name: &str) -> Option<Entity> {
        self.inner.read().groups.get(name).cloned()
    }

    /// Snapshot of a stored user.
    pub fn user(&self, uuid: Uuid) -> Option<Entity> {
        self.inner.read().users.get(&uuid).cloned()
    }

    /// Snapshot of a stored track.
    pub fn track(&self, name: &str) -> Option<Track> {
        self.inner.read().tracks.get(name).cloned()
    }

    /// Number of stored groups.
    pub fn group_count(&self) -> usize {
        self.inner.read().groups.len()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Number of stored tracks.
    pub fn track_count(&self) -> usize {
        self.inner.read().tracks.len()
    }
}

impl CanonicalStore for MemoryStore {
    fn create_or_load_group(&self, name: &str) -> Result<Entity> {
        let mut inner = self.inner.write();
        Ok(inner
            .groups
            .entry(name.to_string())
            .or_insert_with(|| Entity::group(name))
            .clone())
    }

    fn load_user(&self, identity: &Identity) -> Result<Entity> {
        let mut inner = self.inner.write();
        Ok(inner
            .users
            .entry(identity.uuid())
            .or_insert_with(|| Entity::new_user_with_default(identity.clone()))
            .clone())
    }

    fn group_exists(&self, name: &str) -> bool {
        self.inner.read().groups.contains_key(name)
    }

    fn save(&self, entity: &Entity) -> Result<()> {
        let mut inner = self.inner.write();
        match entity.id() {
            EntityId::Group(name) => {
                inner.groups.insert(name.clone(), entity.clone());
            }
            EntityId::User(identity) => {
                inner.users.insert(identity.uuid(), entity.clone());
            }
        }
        Ok(())
    }

    fn create_or_load_track(&self, name: &str) -> Result<Track> {
        let mut inner = self.inner.write();
        Ok(inner
            .tracks
            .entry(name.to_string())
            .or_insert_with(|| Track::new(name))
            .clone())
    }

    fn save_track(&self, track: &Track) -> Result<()> {
        self.inner
            .write()
            .tracks
            .insert(track.name().to_string(), track.clone());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
