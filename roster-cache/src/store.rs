//! Persistent identity cache store.

use chrono::Utc;
use roster_core::{
    idmap, CacheDocument, CacheError, CachedGroup, CachedUser, Group, IdRange, RosterConfig,
    RosterResult, User,
};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::freshness::Ttl;
use crate::index::CacheIndex;

/// Persistent, TTL-bounded store of user and group records.
///
/// One value owns the loaded document, the name indices rebuilt from it,
/// and the freshness policy; it is constructed per query-serving session
/// and passed explicitly to every operation. Every mutating operation
/// ends with a full-document save, and reads treat stale records exactly
/// like absent ones.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    ttl: Ttl,
    id_range: IdRange,
    document: CacheDocument,
    index: CacheIndex,
}

impl CacheStore {
    /// Create a store and load whatever the cache file currently holds.
    ///
    /// A missing or corrupt file degrades to an empty store with a logged
    /// warning. The cache is an optimization: refusing to start over a bad
    /// file would take identity resolution down with it.
    pub fn open(config: &RosterConfig) -> Self {
        let mut store = Self::empty(config);
        if let Err(e) = store.load() {
            tracing::warn!(
                error = %e,
                path = %store.path.display(),
                "Cache load failed, starting empty"
            );
        }
        store
    }

    /// Create a store with no records, without touching the filesystem.
    pub fn empty(config: &RosterConfig) -> Self {
        Self {
            path: config.cache_path.clone(),
            ttl: Ttl::from_seconds(config.ttl_seconds),
            id_range: config.id_range,
            document: CacheDocument::default(),
            index: CacheIndex::default(),
        }
    }

    /// Replace in-memory state with the persisted document and rebuild the
    /// name indices from it.
    ///
    /// On failure the store is left empty and the typed error returned;
    /// the caller decides whether that is fatal.
    pub fn load(&mut self) -> Result<(), CacheError> {
        self.document = CacheDocument::default();
        self.index = CacheIndex::default();

        let raw = fs::read_to_string(&self.path).map_err(|e| CacheError::ReadFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let document: CacheDocument =
            serde_json::from_str(&raw).map_err(|e| CacheError::ParseFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        self.index = CacheIndex::rebuild(&document);
        self.document = document;
        Ok(())
    }

    /// Atomically persist the full document.
    ///
    /// The document is written to a temporary file in the cache file's own
    /// directory, flushed to stable storage, then renamed over the target,
    /// so a concurrent reader observes either the old document or the new
    /// one, never a torn write. Concurrent writers race and the last
    /// rename wins; a lost update is indistinguishable from expiry and is
    /// refetched on a later miss. After the rename the file is made
    /// world-readable so unprivileged reader processes succeed; failing to
    /// set permissions is logged, not a save failure.
    pub fn save(&self) -> Result<(), CacheError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let payload = encode_document(&self.document).map_err(|e| CacheError::WriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| CacheError::WriteFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        tmp.write_all(&payload).map_err(|e| CacheError::WriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        tmp.as_file().sync_all().map_err(|e| CacheError::WriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        tmp.persist(&self.path).map_err(|e| CacheError::ReplaceFailed {
            path: self.path.display().to_string(),
            reason: e.error.to_string(),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o644)) {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Could not make cache file world-readable"
                );
            }
        }

        Ok(())
    }

    /// Look up a fresh user record by uid.
    ///
    /// A stale record is reported exactly like an absent one. `None`
    /// groups in the result means memberships are not cached for this
    /// user; that includes the degraded case where a cached membership
    /// names a group with no record, which the next resolve then
    /// refetches and repairs.
    pub fn user_by_uid(&self, uid: u64) -> Option<(User, Option<Vec<Group>>)> {
        let record = self.document.users.get(&uid)?;
        if !self.ttl.is_fresh(record.last_synced, Utc::now().timestamp()) {
            return None;
        }

        let groups = match &record.groups {
            None => None,
            Some(names) => {
                let mut groups = Vec::with_capacity(names.len());
                for name in names {
                    match self.index.gid_for(name) {
                        Some(gid) => groups.push(Group::new(name.clone(), gid)),
                        None => {
                            tracing::debug!(
                                uid,
                                group = %name,
                                "Cached membership names an unknown group, treating memberships as not cached"
                            );
                            return Some((User::new(record.name.clone(), uid), None));
                        }
                    }
                }
                Some(groups)
            }
        };

        Some((User::new(record.name.clone(), uid), groups))
    }

    /// Look up a fresh user record by name.
    pub fn user_by_name(&self, name: &str) -> Option<(User, Option<Vec<Group>>)> {
        self.user_by_uid(self.index.uid_for(name)?)
    }

    /// Look up a fresh group record by gid.
    pub fn group_by_gid(&self, gid: u64) -> Option<Group> {
        let record = self.document.groups.get(&gid)?;
        if !self.ttl.is_fresh(record.last_synced, Utc::now().timestamp()) {
            return None;
        }
        Some(Group::new(record.name.clone(), gid))
    }

    /// Look up a fresh group record by name.
    pub fn group_by_name(&self, name: &str) -> Option<Group> {
        self.group_by_gid(self.index.gid_for(name)?)
    }

    /// Upsert a user together with records for its membership groups.
    ///
    /// This is the only operation that attaches group names to a user, and
    /// the only one that creates group records from a name alone: each
    /// name's gid comes from the deterministic mapper. All gids are
    /// computed before anything is mutated, so a mapping failure leaves
    /// document and indices untouched, and one save commits the user and
    /// its groups together.
    pub fn update_user(&mut self, user: &User, group_names: &[String]) -> RosterResult<()> {
        let mut gids = Vec::with_capacity(group_names.len());
        for name in group_names {
            gids.push(idmap::map_name(name, self.id_range)?);
        }

        let now = Utc::now().timestamp();
        self.document.users.insert(
            user.uid,
            CachedUser {
                name: user.name.clone(),
                groups: Some(group_names.to_vec()),
                last_synced: now,
            },
        );
        self.index.insert_user(&user.name, user.uid);

        for (name, gid) in group_names.iter().zip(&gids) {
            self.document.groups.insert(
                *gid,
                CachedGroup {
                    name: name.clone(),
                    last_synced: now,
                },
            );
            self.index.insert_group(name, *gid);
        }

        self.save()?;
        Ok(())
    }

    /// Insert records for users not already present.
    ///
    /// Existing records keep their name, memberships, and freshness
    /// untouched; new records start with memberships unknown. One save
    /// commits the whole batch.
    pub fn add_users(&mut self, users: &[User]) -> Result<(), CacheError> {
        let now = Utc::now().timestamp();
        for user in users {
            if self.document.users.contains_key(&user.uid) {
                continue;
            }
            self.document.users.insert(
                user.uid,
                CachedUser {
                    name: user.name.clone(),
                    groups: None,
                    last_synced: now,
                },
            );
            self.index.insert_user(&user.name, user.uid);
        }
        self.save()
    }

    /// Upsert group records under caller-supplied gids, refreshing their
    /// stamps. One save commits the whole batch.
    pub fn add_groups(&mut self, groups: &[Group]) -> Result<(), CacheError> {
        let now = Utc::now().timestamp();
        for group in groups {
            self.document.groups.insert(
                group.gid,
                CachedGroup {
                    name: group.name.clone(),
                    last_synced: now,
                },
            );
            self.index.insert_group(&group.name, group.gid);
        }
        self.save()
    }

    /// Number of user records held, fresh or stale.
    pub fn user_count(&self) -> usize {
        self.document.users.len()
    }

    /// Number of group records held, fresh or stale.
    pub fn group_count(&self) -> usize {
        self.document.groups.len()
    }

    /// The records currently held, for inspection.
    pub fn document(&self) -> &CacheDocument {
        &self.document
    }

    /// The freshness policy this store applies on reads.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// The cache file path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pretty-print with single-space indentation, the cache file's canonical
/// form.
fn encode_document(document: &CacheDocument) -> Result<Vec<u8>, serde_json::Error> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    Ok(buf)
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    // Unique names on both sides so the index inversion is exact, the way
    // a real directory keeps names unique.
    fn arb_document() -> impl Strategy<Value = CacheDocument> {
        let users = proptest::collection::btree_map(
            "[a-z]{1,10}",
            (
                proptest::option::of(proptest::collection::vec("[a-z]{1,8}", 0..4)),
                0i64..2_000_000_000,
            ),
            0..8,
        );
        let groups = proptest::collection::btree_map("[a-z]{1,10}", 0i64..2_000_000_000, 0..8);

        (users, groups).prop_map(|(users, groups)| {
            let mut document = CacheDocument::default();
            for (i, (name, (memberships, last_synced))) in users.into_iter().enumerate() {
                document.users.insert(
                    1000 + i as u64,
                    CachedUser {
                        name,
                        groups: memberships,
                        last_synced,
                    },
                );
            }
            for (i, (name, last_synced)) in groups.into_iter().enumerate() {
                document.groups.insert(
                    5000 + i as u64,
                    CachedGroup { name, last_synced },
                );
            }
            document
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: save then load yields equal record maps, with rebuilt
        /// name indices that exactly invert them.
        #[test]
        fn prop_save_load_round_trip(document in arb_document()) {
            let dir = TempDir::new().unwrap();
            let config = RosterConfig {
                cache_path: dir.path().join("roster.json"),
                ttl_seconds: -1,
                id_range: IdRange::new(1000, u64::MAX),
                default_group: "everyone".to_string(),
            };

            let mut store = CacheStore::empty(&config);
            store.document = document.clone();
            store.save().unwrap();

            let mut reloaded = CacheStore::empty(&config);
            reloaded.load().unwrap();
            prop_assert_eq!(reloaded.document(), &document);

            for (uid, record) in &reloaded.document.users {
                prop_assert_eq!(reloaded.index.uid_for(&record.name), Some(*uid));
            }
            for (gid, record) in &reloaded.document.groups {
                prop_assert_eq!(reloaded.index.gid_for(&record.name), Some(*gid));
            }
        }
    }
}
