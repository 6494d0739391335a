//! # Migration Driver
//!
//! Orchestrates one complete pass over a legacy source.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MIGRATION PIPELINE                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. begin_bulk_read     source suspends callbacks; failure is fatal    │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  2. Collect groups      per-namespace records merged by standardized   │
//! │            │            name; ranks and ladders remembered             │
//! │            ▼                                                            │
//! │  3. Weight scale        one translation for the whole pass             │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  4. Flush groups        create-or-load, weight, nodes, save            │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  5. Tracks              enumerated ladders + ladders synthesized       │
//! │            │            from group rank fields                         │
//! │            ▼                                                            │
//! │  6. Users               identities resolved, records merged, nodes     │
//! │            │            built, primary group applied, save             │
//! │            ▼                                                            │
//! │  7. end_bulk_read       summary reported                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Group migration always completes before user migration begins: user
//! records reference group names that must already exist in the target
//! store. Within each phase, entities are processed one at a time and an
//! entity-scoped failure skips that entity only.

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::entity::Entity;
use crate::error::Result;
use crate::identity::resolver::{IdentityResolver, NameLookup};
use crate::identity::Identity;
use crate::names::standardize_name;
use crate::node::{parse_node, CanonicalNode, NodeBuilder, SERVER_KEY, WORLD_KEY};
use crate::primary::{self, PrimaryCandidate};
use crate::report::Reporter;
use crate::source::{LegacySource, RawGroup, RawOption, RawParent, RawPermission, RawTrack, RawUser};
use crate::store::CanonicalStore;
use crate::weight::{RankConvention, WeightScale};
use crate::MigrationConfig;

mod iterate;

use iterate::{try_each, ProgressTicker};

/// Option keys consumed by other pipeline stages, never stored as meta.
const BOOKKEEPING_OPTION_KEYS: &[&str] = &["weight", "rank", "rank-ladder", "name", "username"];

/// Final counts for one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Groups saved.
    pub groups: usize,
    /// Tracks saved.
    pub tracks: usize,
    /// Users saved.
    pub users: usize,
    /// Records skipped after entity-scoped failures.
    pub skipped: usize,
}

/// One migration pass over a legacy source.
///
/// Holds references to the collaborators for the duration of the pass and
/// nothing else; every invocation starts from empty accumulation state.
pub struct MigrationSession<'a> {
    store: &'a dyn CanonicalStore,
    names: &'a dyn NameLookup,
    reporter: &'a dyn Reporter,
    config: MigrationConfig,
}

impl<'a> MigrationSession<'a> {
    /// A new session over the given collaborators.
    pub fn new(
        store: &'a dyn CanonicalStore,
        names: &'a dyn NameLookup,
        reporter: &'a dyn Reporter,
        config: MigrationConfig,
    ) -> Self {
        Self {
            store,
            names,
            reporter,
            config,
        }
    }

    /// Run one complete pass.
    ///
    /// Only a failed precondition (source unavailable, enumeration
    /// refused) aborts; every per-entity failure is logged, counted in
    /// the summary, and skipped.
    pub fn run(&self, source: &dyn LegacySource) -> Result<MigrationSummary> {
        self.reporter
            .report(&format!("Starting migration from {}.", source.name()));
        source.begin_bulk_read()?;

        let default_alias = source.default_group().map(|g| standardize_name(&g));
        let mut summary = MigrationSummary::default();

        // ---- collect groups ----
        self.reporter.report("Collecting group data.");
        let mut groups: BTreeMap<String, GroupAccum> = BTreeMap::new();
        for record in source.groups()? {
            let name = self.map_group_name(&record.name, default_alias.as_deref());
            if name.is_empty() {
                tracing::warn!("skipping group record with empty name");
                summary.skipped += 1;
                continue;
            }
            groups.entry(name).or_default().merge(record);
        }
        self.reporter
            .report(&format!("Found {} groups.", groups.len()));

        // ---- weight scale ----
        let scale = WeightScale::from_ranks(
            source.ranking(),
            groups.values().filter_map(|accum| accum.rank),
        );
        let group_ranks: HashMap<String, i64> = groups
            .iter()
            .filter_map(|(name, accum)| accum.rank.map(|rank| (name.clone(), rank)))
            .collect();

        // Ladders the groups declare but the source does not enumerate as
        // tracks are synthesized from the rank fields.
        let tracks = self.assemble_tracks(source, &groups, default_alias.as_deref())?;

        // ---- flush groups ----
        self.reporter.report("Starting group migration.");
        let mut ticker = ProgressTicker::new(self.reporter, "groups", self.config.progress_interval);
        let counts = try_each(
            groups.into_iter().collect(),
            |(name, _)| format!("group {name}"),
            |(name, accum)| {
                self.migrate_group(&name, accum, &scale, default_alias.as_deref())?;
                ticker.tick();
                Ok(())
            },
        )?;
        summary.groups = counts.processed;
        summary.skipped += counts.skipped;
        self.reporter
            .report(&format!("Migrated {} groups.", counts.processed));

        // ---- tracks ----
        self.reporter.report("Starting track migration.");
        let mut ticker = ProgressTicker::new(self.reporter, "tracks", self.config.progress_interval);
        let counts = try_each(
            tracks,
            |track| format!("track {}", track.name),
            |track| {
                self.migrate_track(track, default_alias.as_deref())?;
                ticker.tick();
                Ok(())
            },
        )?;
        summary.tracks = counts.processed;
        summary.skipped += counts.skipped;
        self.reporter
            .report(&format!("Migrated {} tracks.", counts.processed));

        // ---- collect users ----
        self.reporter.report("Collecting user data.");
        let resolver = IdentityResolver::new(self.names);
        let mut users: BTreeMap<Uuid, (Identity, UserAccum)> = BTreeMap::new();
        for record in source.users()? {
            match resolver.resolve(&record.identifier, record.display_name.as_deref()) {
                Ok(identity) => {
                    users
                        .entry(identity.uuid())
                        .or_insert_with(|| (identity, UserAccum::default()))
                        .1
                        .merge(record);
                }
                Err(err) => {
                    summary.skipped += 1;
                    tracing::warn!("skipping user record {}: {err}", record.identifier);
                }
            }
        }
        self.reporter
            .report(&format!("Found {} users.", users.len()));

        // ---- flush users ----
        self.reporter.report("Starting user migration.");
        let mut ticker = ProgressTicker::new(self.reporter, "users", self.config.progress_interval);
        let user_weight = scale.user_weight();
        let counts = try_each(
            users.into_values().collect(),
            |(identity, _)| format!("user {identity}"),
            |(identity, accum)| {
                self.migrate_user(
                    &identity,
                    accum,
                    &group_ranks,
                    user_weight,
                    default_alias.as_deref(),
                )?;
                ticker.tick();
                Ok(())
            },
        )?;
        summary.users = counts.processed;
        summary.skipped += counts.skipped;
        self.reporter
            .report(&format!("Migrated {} users.", counts.processed));

        source.end_bulk_read()?;
        self.reporter.report("Success! Migration complete.");
        Ok(summary)
    }

    // ------------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------------

    fn migrate_group(
        &self,
        name: &str,
        accum: GroupAccum,
        scale: &WeightScale,
        default_alias: Option<&str>,
    ) -> Result<()> {
        let mut entity = self.store.create_or_load_group(name)?;

        let weight = match accum.rank {
            Some(rank) => {
                let weight = scale.translate(rank);
                entity.set_weight(weight);
                weight
            }
            None => scale.overflow_weight(),
        };

        self.add_permission_nodes(&mut entity, &accum.permissions)?;

        for parent in &accum.parents {
            let parent_name = self.map_group_name(&parent.group, default_alias);
            if parent_name.is_empty() || parent_name == name {
                continue;
            }
            let builder = self
                .contextualize(
                    CanonicalNode::inheritance(&parent_name),
                    parent.server.as_deref(),
                    parent.world.as_deref(),
                )
                .expiry(parent.expiry);
            self.push_node(&mut entity, builder)?;
        }

        self.add_option_nodes(&mut entity, &accum.options, weight)?;

        self.store.save(&entity)
    }

    // ------------------------------------------------------------------------
    // Tracks
    // ------------------------------------------------------------------------

    fn assemble_tracks(
        &self,
        source: &dyn LegacySource,
        groups: &BTreeMap<String, GroupAccum>,
        default_alias: Option<&str>,
    ) -> Result<Vec<RawTrack>> {
        let mut tracks = source.tracks()?;
        let covered: HashSet<String> = tracks
            .iter()
            .map(|track| standardize_name(&track.name))
            .collect();

        let mut ladders: BTreeMap<String, Vec<(i64, String)>> = BTreeMap::new();
        for (name, accum) in groups {
            let (Some(ladder), Some(rank)) = (&accum.ladder, accum.rank) else {
                continue;
            };
            let ladder = self.map_group_name(ladder, default_alias);
            if ladder.is_empty() || covered.contains(&ladder) {
                continue;
            }
            ladders.entry(ladder).or_default().push((rank, name.clone()));
        }

        for (name, mut members) in ladders {
            // Promotion order is least senior first, whichever way the
            // source counts.
            match source.ranking() {
                RankConvention::AscendingPrecedence => members.sort_by(|a, b| b.0.cmp(&a.0)),
                RankConvention::DirectWeight => members.sort_by(|a, b| a.0.cmp(&b.0)),
            }
            tracks.push(RawTrack {
                name,
                groups: members.into_iter().map(|(_, group)| group).collect(),
            });
        }

        Ok(tracks)
    }

    fn migrate_track(&self, raw: RawTrack, default_alias: Option<&str>) -> Result<()> {
        let name = standardize_name(&raw.name);
        if name.is_empty() {
            return Err(crate::error::Error::MalformedRecord(
                "empty track name".into(),
            ));
        }

        let mut track = self.store.create_or_load_track(&name)?;
        track.clear();
        for group in &raw.groups {
            let group = self.map_group_name(group, default_alias);
            if self.store.group_exists(&group) {
                track.append(group);
            }
        }
        self.store.save_track(&track)
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    fn migrate_user(
        &self,
        identity: &Identity,
        accum: UserAccum,
        group_ranks: &HashMap<String, i64>,
        user_weight: i64,
        default_alias: Option<&str>,
    ) -> Result<()> {
        let mut entity = self.store.load_user(identity)?;

        self.add_permission_nodes(&mut entity, &accum.permissions)?;

        let mut candidates = Vec::new();
        for parent in &accum.parents {
            let parent_name = self.map_group_name(&parent.group, default_alias);
            if parent_name.is_empty() {
                continue;
            }

            let builder = self
                .contextualize(
                    CanonicalNode::inheritance(&parent_name),
                    parent.server.as_deref(),
                    parent.world.as_deref(),
                )
                .expiry(parent.expiry);
            match builder.build() {
                Ok(node) => {
                    candidates.push(PrimaryCandidate {
                        weight: group_ranks.get(&parent_name).copied().unwrap_or(i64::MAX),
                        global: node.contexts().is_global(),
                        expiry: node.expiry(),
                        group: parent_name,
                    });
                    entity.add_node(node);
                }
                Err(crate::error::Error::AlreadyExpired) => continue,
                Err(err) => return Err(err),
            }
        }

        self.add_option_nodes(&mut entity, &accum.options, user_weight)?;

        let explicit = accum
            .primary
            .as_deref()
            .map(|name| self.map_group_name(name, default_alias))
            .filter(|name| !name.is_empty());
        if let Some(primary) = primary::resolve_primary(explicit.as_deref(), &candidates) {
            primary::apply_primary(&mut entity, &primary);
        }

        self.store.save(&entity)
    }

    // ------------------------------------------------------------------------
    // Shared node building
    // ------------------------------------------------------------------------

    fn add_permission_nodes(
        &self,
        entity: &mut Entity,
        permissions: &[RawPermission],
    ) -> Result<()> {
        for perm in permissions {
            if perm.node.is_empty() {
                continue;
            }
            let (key, value) = parse_node(&perm.node, perm.value.unwrap_or(true));
            let builder = self
                .contextualize(
                    CanonicalNode::builder(key).value(value),
                    perm.server.as_deref(),
                    perm.world.as_deref(),
                )
                .expiry(perm.expiry);
            self.push_node(entity, builder)?;
        }
        Ok(())
    }

    fn add_option_nodes(
        &self,
        entity: &mut Entity,
        options: &[RawOption],
        weight: i64,
    ) -> Result<()> {
        for option in options {
            let key = option.key.trim().to_lowercase();
            if key.is_empty() || option.value.is_empty() {
                continue;
            }

            let builder = if key == "prefix" {
                CanonicalNode::prefix(weight, &option.value)
            } else if key == "suffix" {
                CanonicalNode::suffix(weight, &option.value)
            } else if is_bookkeeping_option(&key) {
                continue;
            } else {
                CanonicalNode::meta(&key, &option.value)
            };

            let builder =
                self.contextualize(builder, option.server.as_deref(), option.world.as_deref());
            self.push_node(entity, builder)?;
        }
        Ok(())
    }

    /// Attach namespace contexts, unless the pass collapses them.
    fn contextualize(
        &self,
        builder: NodeBuilder,
        server: Option<&str>,
        world: Option<&str>,
    ) -> NodeBuilder {
        if self.config.collapse_namespaces {
            return builder;
        }
        let mut builder = builder;
        if let Some(server) = server {
            builder = builder.context(SERVER_KEY, server);
        }
        if let Some(world) = world {
            builder = builder.context(WORLD_KEY, world);
        }
        builder
    }

    /// Build and insert; an already-expired node is dropped silently.
    fn push_node(&self, entity: &mut Entity, builder: NodeBuilder) -> Result<()> {
        match builder.build() {
            Ok(node) => {
                entity.add_node(node);
                Ok(())
            }
            Err(crate::error::Error::AlreadyExpired) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn map_group_name(&self, raw: &str, default_alias: Option<&str>) -> String {
        let name = standardize_name(raw);
        match default_alias {
            Some(alias) if name == alias => crate::entity::DEFAULT_GROUP.to_string(),
            _ => name,
        }
    }
}

fn is_bookkeeping_option(key: &str) -> bool {
    BOOKKEEPING_OPTION_KEYS.contains(&key)
        || (key.starts_with("group-") && key.ends_with("-until"))
}

/// Per-group accumulation entry; per-namespace records for the same
/// standardized name merge here before anything is written.
#[derive(Debug, Default)]
struct GroupAccum {
    rank: Option<i64>,
    ladder: Option<String>,
    permissions: Vec<RawPermission>,
    parents: Vec<RawParent>,
    options: Vec<RawOption>,
}

impl GroupAccum {
    fn merge(&mut self, record: RawGroup) {
        if self.rank.is_none() {
            self.rank = record.rank;
        }
        if self.ladder.is_none() {
            self.ladder = record.ladder;
        }
        self.permissions.extend(record.permissions);
        self.parents.extend(record.parents);
        self.options.extend(record.options);
    }
}

/// Per-user accumulation entry, keyed by resolved identity.
#[derive(Debug, Default)]
struct UserAccum {
    primary: Option<String>,
    permissions: Vec<RawPermission>,
    parents: Vec<RawParent>,
    options: Vec<RawOption>,
}

impl UserAccum {
    fn merge(&mut self, record: RawUser) {
        if self.primary.is_none() {
            self.primary = record.primary_group;
        }
        self.permissions.extend(record.permissions);
        self.parents.extend(record.parents);
        self.options.extend(record.options);
    }
}

// ============================================================================
// TESTS
// ============================================================================
