//! Roster Test Utilities
//!
//! Centralized test infrastructure for the roster workspace:
//! - Proptest generators for identity types and cache documents
//! - The shared mock directory source, re-exported from its crate
//! - Fixtures for canonical cache files and configuration

// Re-export the mock directory from its source crate
pub use roster_resolve::{CallCounts, MockDirectory};

// Re-export core types for convenience
pub use roster_cache::{CacheIndex, CacheStore, Ttl};
pub use roster_core::{
    map_name, CacheDocument, CachedGroup, CachedUser, Group, IdRange, RosterConfig, User,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating roster identity types.

    use proptest::prelude::*;
    use roster_core::{map_name, CacheDocument, CachedGroup, CachedUser, Group, User};

    use crate::fixtures::default_id_range;

    /// Generate a name the deterministic mapper accepts.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[a-z]{1,13}"
    }

    /// Generate a last-synced timestamp within a plausible epoch window.
    pub fn arb_last_synced() -> impl Strategy<Value = i64> {
        0i64..2_000_000_000
    }

    /// Generate a user whose uid is the mapper image of its name, the way
    /// a production directory source assigns ids.
    pub fn arb_directory_user() -> impl Strategy<Value = User> {
        arb_name().prop_map(|name| {
            let uid = map_name(&name, default_id_range()).unwrap();
            User::new(name, uid)
        })
    }

    /// Generate a group whose gid is the mapper image of its name.
    pub fn arb_directory_group() -> impl Strategy<Value = Group> {
        arb_name().prop_map(|name| {
            let gid = map_name(&name, default_id_range()).unwrap();
            Group::new(name, gid)
        })
    }

    /// Generate a cache document with unique names on both sides, the way
    /// a real directory keeps them.
    pub fn arb_cache_document() -> impl Strategy<Value = CacheDocument> {
        let users = proptest::collection::btree_map(
            arb_name(),
            (
                proptest::option::of(proptest::collection::vec(arb_name(), 0..4)),
                arb_last_synced(),
            ),
            0..8,
        );
        let groups = proptest::collection::btree_map(arb_name(), arb_last_synced(), 0..8);

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
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Fixtures for common test scenarios.

    use roster_core::{map_name, Group, IdRange, RosterConfig, User};
    use roster_resolve::MockDirectory;
    use std::path::PathBuf;

    /// Id range used across the workspace's tests: floor-bounded below,
    /// unbounded above so every mappable name fits.
    pub fn default_id_range() -> IdRange {
        IdRange::new(1000, u64::MAX)
    }

    /// Configuration pointing at `cache_path`, with test-friendly defaults.
    pub fn config_at(cache_path: impl Into<PathBuf>) -> RosterConfig {
        RosterConfig {
            cache_path: cache_path.into(),
            ttl_seconds: 3600,
            id_range: default_id_range(),
            default_group: "everyone".to_string(),
        }
    }

    /// A user whose uid is what the mapper assigns its name.
    pub fn directory_user(name: &str) -> User {
        User::new(name, map_name(name, default_id_range()).unwrap())
    }

    /// A group whose gid is what the mapper assigns its name.
    pub fn directory_group(name: &str) -> Group {
        Group::new(name, map_name(name, default_id_range()).unwrap())
    }

    /// A directory seeded with a small team: alice in engineering and ops,
    /// bob in ops, carol with no memberships, plus an unattached research
    /// group and one credential pair for alice.
    pub fn team_directory() -> MockDirectory {
        let directory = MockDirectory::new();
        directory.add_user(
            directory_user("alice"),
            &[directory_group("engineering"), directory_group("ops")],
        );
        directory.add_user(directory_user("bob"), &[directory_group("ops")]);
        directory.add_user(directory_user("carol"), &[]);
        directory.add_group(directory_group("research"));
        directory.add_secret("alice", "s3cret");
        directory
    }

    /// Canonical cache file content with one user and one group, in the
    /// exact single-space-indented form the store writes.
    pub fn sample_cache_json() -> &'static str {
        "{\n \"userID\": {\n  \"1001\": {\n   \"username\": \"alice\",\n   \"groups\": null,\n   \"lastSynced\": 7\n  }\n },\n \"groupID\": {\n  \"2001\": {\n   \"groupname\": \"staff\",\n   \"lastSynced\": 7\n  }\n }\n}"
    }

    /// Canonical TOML configuration for CLI tests, pointing at `cache_path`.
    pub fn sample_config_toml(cache_path: &str) -> String {
        format!(
            r#"cache_path = "{cache_path}"
cache_ttl_seconds = 600
min_id = 2000200001
max_id = 4294967294
default_group = "users"
"#
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roster_resolve::{verify_credentials, Resolver};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_fixtures_assign_mapper_ids() {
        // "a" is the smallest mappable name and lands on the range floor.
        assert_eq!(fixtures::directory_group("a").gid, 1000);
        assert_eq!(fixtures::directory_user("alice").uid, 775283);
    }

    #[test]
    fn test_team_directory_resolves_the_seeded_team() {
        let dir = TempDir::new().unwrap();
        let config = fixtures::config_at(dir.path().join("roster.json"));
        let directory = fixtures::team_directory();
        let mut resolver = Resolver::new(&config, CacheStore::open(&config), directory.clone());

        let alice = resolver.user_by_name("alice").unwrap();
        assert_eq!(alice.group_names(), vec!["engineering", "ops", "everyone"]);

        let bob = resolver.user_by_name("bob").unwrap();
        assert_eq!(bob.group_names(), vec!["ops", "everyone"]);

        let carol = resolver.user_by_name("carol").unwrap();
        assert_eq!(carol.group_names(), vec!["everyone"]);

        let research = resolver.group_by_name("research").unwrap();
        assert_eq!(research.gid, fixtures::directory_group("research").gid);

        assert!(verify_credentials(&directory, "alice", "s3cret"));
        assert!(!verify_credentials(&directory, "alice", "wrong"));
        assert!(!verify_credentials(&directory, "mallory", "s3cret"));
    }

    #[test]
    fn test_sample_cache_json_round_trips_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let mut config = fixtures::config_at(dir.path().join("roster.json"));
        config.ttl_seconds = -1;
        fs::write(&config.cache_path, fixtures::sample_cache_json()).unwrap();

        let store = CacheStore::open(&config);
        let (user, groups) = store.user_by_name("alice").unwrap();
        assert_eq!(user.uid, 1001);
        assert_eq!(groups, None);
        assert_eq!(store.group_by_name("staff").map(|g| g.gid), Some(2001));

        // Saving the loaded document reproduces the fixture byte for byte.
        store.save().unwrap();
        assert_eq!(
            fs::read_to_string(&config.cache_path).unwrap(),
            fixtures::sample_cache_json()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_names_always_map(name in generators::arb_name()) {
            prop_assert!(map_name(&name, fixtures::default_id_range()).is_ok());
        }

        #[test]
        fn prop_generated_timestamps_fit_the_epoch_window(ts in generators::arb_last_synced()) {
            prop_assert!((0i64..2_000_000_000).contains(&ts));
        }

        #[test]
        fn prop_generated_records_carry_mapper_ids(
            user in generators::arb_directory_user(),
            group in generators::arb_directory_group(),
        ) {
            let range = fixtures::default_id_range();
            prop_assert_eq!(map_name(&user.name, range).unwrap(), user.uid);
            prop_assert_eq!(map_name(&group.name, range).unwrap(), group.gid);
        }

        #[test]
        fn prop_generated_documents_load_and_save_through_a_store(
            document in generators::arb_cache_document(),
        ) {
            let dir = TempDir::new().unwrap();
            let mut config = fixtures::config_at(dir.path().join("roster.json"));
            config.ttl_seconds = -1;
            fs::write(&config.cache_path, serde_json::to_string(&document).unwrap()).unwrap();

            let store = CacheStore::open(&config);
            prop_assert_eq!(store.document(), &document);
            store.save().unwrap();

            let reloaded = CacheStore::open(&config);
            prop_assert_eq!(reloaded.document(), &document);
            for (uid, record) in &document.users {
                prop_assert_eq!(
                    reloaded.user_by_name(&record.name).map(|(u, _)| u.uid),
                    Some(*uid)
                );
            }
            for (gid, record) in &document.groups {
                prop_assert_eq!(
                    reloaded.group_by_name(&record.name).map(|g| g.gid),
                    Some(*gid)
                );
            }
        }
    }
}
