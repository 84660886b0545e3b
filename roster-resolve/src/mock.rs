//! In-memory mock directory for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use roster_core::error::SourceError;
use roster_core::types::{Group, User};

use crate::source::{Authenticator, DirectorySource};

/// Per-method call counts observed by a [`MockDirectory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub user: usize,
    pub all_users: usize,
    pub user_groups: usize,
    pub all_groups: usize,
    pub authenticate: usize,
}

/// In-memory mock directory for testing.
///
/// Clones share state, so a test keeps one handle for seeding and
/// assertions while the resolver owns another.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    users: Arc<RwLock<Vec<User>>>,
    memberships: Arc<RwLock<HashMap<String, Vec<Group>>>>,
    groups: Arc<RwLock<Vec<Group>>>,
    secrets: Arc<RwLock<HashMap<String, String>>>,
    offline: Arc<RwLock<bool>>,
    calls: Arc<RwLock<CallCounts>>,
}

impl MockDirectory {
    /// Create an empty mock directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user together with its ordered group memberships.
    ///
    /// Membership groups are also added to the enumerable group list;
    /// the first record seeded under a gid wins.
    pub fn add_user(&self, user: User, groups: &[Group]) {
        self.memberships
            .write()
            .unwrap()
            .insert(user.name.clone(), groups.to_vec());
        for group in groups {
            self.add_group(group.clone());
        }
        self.users.write().unwrap().push(user);
    }

    /// Seed a group without attaching it to any user.
    pub fn add_group(&self, group: Group) {
        let mut groups = self.groups.write().unwrap();
        if !groups.iter().any(|g| g.gid == group.gid) {
            groups.push(group);
        }
    }

    /// Seed a credential pair accepted by `authenticate`.
    pub fn add_secret(&self, username: impl Into<String>, secret: impl Into<String>) {
        self.secrets
            .write()
            .unwrap()
            .insert(username.into(), secret.into());
    }

    /// Make every directory call fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.write().unwrap() = offline;
    }

    /// Call counts accumulated so far.
    pub fn calls(&self) -> CallCounts {
        *self.calls.read().unwrap()
    }

    fn check_online(&self) -> Result<(), SourceError> {
        if *self.offline.read().unwrap() {
            return Err(SourceError::QueryFailed {
                reason: "directory offline".to_string(),
            });
        }
        Ok(())
    }
}

impl DirectorySource for MockDirectory {
    fn user(&self, name: &str) -> Result<Option<User>, SourceError> {
        self.calls.write().unwrap().user += 1;
        self.check_online()?;
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.name == name)
            .cloned())
    }

    fn all_users(&self) -> Result<Vec<User>, SourceError> {
        self.calls.write().unwrap().all_users += 1;
        self.check_online()?;
        Ok(self.users.read().unwrap().clone())
    }

    fn user_groups(&self, user: &User) -> Result<Vec<Group>, SourceError> {
        self.calls.write().unwrap().user_groups += 1;
        self.check_online()?;
        Ok(self
            .memberships
            .read()
            .unwrap()
            .get(&user.name)
            .cloned()
            .unwrap_or_default())
    }

    fn all_groups(&self) -> Result<Vec<Group>, SourceError> {
        self.calls.write().unwrap().all_groups += 1;
        self.check_online()?;
        Ok(self.groups.read().unwrap().clone())
    }
}

impl Authenticator for MockDirectory {
    fn authenticate(&self, username: &str, secret: &str) -> Result<bool, SourceError> {
        self.calls.write().unwrap().authenticate += 1;
        if *self.offline.read().unwrap() {
            return Err(SourceError::AuthFailed {
                reason: "directory offline".to_string(),
            });
        }
        Ok(self.secrets.read().unwrap().get(username).map(String::as_str) == Some(secret))
    }
}
