//! Identity records and the persisted cache document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user identity as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub uid: u64,
}

impl User {
    /// Create a new user identity.
    pub fn new(name: impl Into<String>, uid: u64) -> Self {
        Self {
            name: name.into(),
            uid,
        }
    }
}

/// A group identity as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub gid: u64,
}

impl Group {
    /// Create a new group identity.
    pub fn new(name: impl Into<String>, gid: u64) -> Self {
        Self {
            name: name.into(),
            gid,
        }
    }
}

/// Persisted user record, keyed by uid in the cache document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    #[serde(rename = "username")]
    pub name: String,

    /// Ordered membership group names. `None` means memberships were never
    /// fetched for this user; `Some(vec![])` means the user is known to
    /// have no memberships. The distinction survives serialization as
    /// `null` versus `[]`.
    pub groups: Option<Vec<String>>,

    /// Seconds since the Unix epoch at which this record was written.
    #[serde(rename = "lastSynced")]
    pub last_synced: i64,
}

/// Persisted group record, keyed by gid in the cache document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedGroup {
    #[serde(rename = "groupname")]
    pub name: String,

    /// Seconds since the Unix epoch at which this record was written.
    #[serde(rename = "lastSynced")]
    pub last_synced: i64,
}

/// The unit of persistence: every record the cache holds.
///
/// Numeric keys serialize as decimal strings (the only map-key form JSON
/// permits), and either section may be absent from an on-disk document.
/// BTreeMap keeps the serialized output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(rename = "userID", default)]
    pub users: BTreeMap<u64, CachedUser>,

    #[serde(rename = "groupID", default)]
    pub groups: BTreeMap<u64, CachedGroup>,
}

impl CacheDocument {
    /// True when no records of either kind are present.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
