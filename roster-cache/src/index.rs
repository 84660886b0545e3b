//! Secondary name-to-id indices.
//!
//! The persisted document is keyed by numeric id, but most queries arrive
//! by name. These indices are rebuilt from the document on load and kept
//! in step with every mutation; they are never persisted, so the document
//! stays the single source of truth.

use roster_core::CacheDocument;
use std::collections::HashMap;

/// In-memory name lookup over the numeric-keyed record maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheIndex {
    users: HashMap<String, u64>,
    groups: HashMap<String, u64>,
}

impl CacheIndex {
    /// Rebuild both indices from a document.
    pub fn rebuild(document: &CacheDocument) -> Self {
        let mut index = Self::default();
        for (uid, record) in &document.users {
            index.users.insert(record.name.clone(), *uid);
        }
        for (gid, record) in &document.groups {
            index.groups.insert(record.name.clone(), *gid);
        }
        index
    }

    /// Uid recorded for a user name, if any.
    pub fn uid_for(&self, name: &str) -> Option<u64> {
        self.users.get(name).copied()
    }

    /// Gid recorded for a group name, if any.
    pub fn gid_for(&self, name: &str) -> Option<u64> {
        self.groups.get(name).copied()
    }

    /// Record or replace a user name mapping.
    pub fn insert_user(&mut self, name: &str, uid: u64) {
        self.users.insert(name.to_string(), uid);
    }

    /// Record or replace a group name mapping.
    pub fn insert_group(&mut self, name: &str, gid: u64) {
        self.groups.insert(name.to_string(), gid);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{CachedGroup, CachedUser};

    #[test]
    fn test_rebuild_inverts_record_maps() {
        let mut document = CacheDocument::default();
        document.users.insert(
            1001,
            CachedUser {
                name: "alice".to_string(),
                groups: None,
                last_synced: 0,
            },
        );
        document.groups.insert(
            2001,
            CachedGroup {
                name: "staff".to_string(),
                last_synced: 0,
            },
        );

        let index = CacheIndex::rebuild(&document);
        assert_eq!(index.uid_for("alice"), Some(1001));
        assert_eq!(index.gid_for("staff"), Some(2001));
        assert_eq!(index.uid_for("staff"), None);
        assert_eq!(index.gid_for("alice"), None);
    }

    #[test]
    fn test_insert_replaces_existing_mapping() {
        let mut index = CacheIndex::default();
        index.insert_user("alice", 1001);
        index.insert_user("alice", 1002);
        assert_eq!(index.uid_for("alice"), Some(1002));
    }

    #[test]
    fn test_unknown_name_is_absent() {
        let index = CacheIndex::rebuild(&CacheDocument::default());
        assert_eq!(index.uid_for("nobody"), None);
        assert_eq!(index.gid_for("nothing"), None);
    }
}
