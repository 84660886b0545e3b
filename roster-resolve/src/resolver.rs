//! Read-through identity resolution.
//!
//! The [`Resolver`] answers the four query shapes a host asks about
//! identities: user by name, user by uid, group by name, group by gid.
//! Every query consults the cache first and falls through to the
//! [`DirectorySource`](crate::source::DirectorySource) on a miss, writing
//! fetched records back so the next query within the TTL window is served
//! locally. Source failures answer "not found" after logging; a directory
//! outage must never admit a user the cache cannot vouch for.

use roster_cache::CacheStore;
use roster_core::{idmap, Group, IdRange, RosterConfig, SourceError, User};

use crate::entry::ResolvedUser;
use crate::source::DirectorySource;

/// Read-through resolver over a cache store and a directory source.
///
/// Queries take `&mut self`: a miss mutates the store through write-back.
/// One resolver serves one process; cross-process coordination happens
/// through the store's atomic file replacement, not in here.
pub struct Resolver<S> {
    store: CacheStore,
    source: S,
    default_group: String,
    id_range: IdRange,
}

impl<S: DirectorySource> Resolver<S> {
    /// Build a resolver from validated configuration, a store opened on
    /// the configured cache path, and a directory source.
    pub fn new(config: &RosterConfig, store: CacheStore, source: S) -> Self {
        Self {
            store,
            source,
            default_group: config.default_group.clone(),
            id_range: config.id_range,
        }
    }

    /// The underlying cache store, for inspection.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve a user by login name.
    ///
    /// Cache miss falls through to a single-user directory lookup. A user
    /// the directory does not know is `None` without logging; a directory
    /// failure is `None` with a logged warning.
    pub fn user_by_name(&mut self, name: &str) -> Option<ResolvedUser> {
        let (user, cached_groups, fetched_user) = match self.store.user_by_name(name) {
            Some((user, groups)) => (user, groups, false),
            None => match self.source.user(name) {
                Ok(Some(user)) => (user, None, true),
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(
                        user = %name,
                        error = %e,
                        "User lookup against the directory failed"
                    );
                    return None;
                }
            },
        };
        self.resolve_with_groups(user, cached_groups, fetched_user)
    }

    /// Resolve a user by uid.
    ///
    /// The directory cannot answer uid queries directly, so a cache miss
    /// enumerates every user, persists the batch, and scans it. A uid
    /// absent from the enumeration stays `None`; the batch remains cached
    /// so the next miss is cheaper.
    pub fn user_by_uid(&mut self, uid: u64) -> Option<ResolvedUser> {
        if uid == 0 {
            // root is never resolved remotely
            return None;
        }

        let (user, cached_groups, fetched_user) = match self.store.user_by_uid(uid) {
            Some((user, groups)) => (user, groups, false),
            None => {
                let users = match self.resync_users() {
                    Ok(users) => users,
                    Err(e) => {
                        tracing::warn!(
                            uid,
                            error = %e,
                            "User enumeration against the directory failed"
                        );
                        return None;
                    }
                };
                let user = users.into_iter().find(|u| u.uid == uid)?;
                (user, None, true)
            }
        };
        self.resolve_with_groups(user, cached_groups, fetched_user)
    }

    /// Resolve a group by name.
    pub fn group_by_name(&mut self, name: &str) -> Option<Group> {
        if let Some(group) = self.store.group_by_name(name) {
            return Some(group);
        }

        let groups = match self.resync_groups() {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!(
                    group = %name,
                    error = %e,
                    "Group enumeration against the directory failed"
                );
                return None;
            }
        };
        groups.into_iter().find(|g| g.name == name)
    }

    /// Resolve a group by gid.
    pub fn group_by_gid(&mut self, gid: u64) -> Option<Group> {
        if let Some(group) = self.store.group_by_gid(gid) {
            return Some(group);
        }

        let groups = match self.resync_groups() {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!(
                    gid,
                    error = %e,
                    "Group enumeration against the directory failed"
                );
                return None;
            }
        };
        groups.into_iter().find(|g| g.gid == gid)
    }

    /// Enumerate every user from the directory and persist the batch.
    ///
    /// A directory failure propagates; a persistence failure is logged
    /// and the enumeration still returned, since the caller's answer does
    /// not depend on the cache accepting it.
    pub fn resync_users(&mut self) -> Result<Vec<User>, SourceError> {
        let users = self.source.all_users()?;
        if let Err(e) = self.store.add_users(&users) {
            tracing::warn!(error = %e, "Persisting enumerated users failed");
        }
        Ok(users)
    }

    /// Enumerate every group from the directory and persist the batch.
    pub fn resync_groups(&mut self) -> Result<Vec<Group>, SourceError> {
        let groups = self.source.all_groups()?;
        if let Err(e) = self.store.add_groups(&groups) {
            tracing::warn!(error = %e, "Persisting enumerated groups failed");
        }
        Ok(groups)
    }

    /// Finish a user resolution once the identity is known.
    ///
    /// Memberships come from the cache when it had them, otherwise from
    /// the directory. The default group is appended last when absent, the
    /// assembled list is written back if anything was fetched, and an
    /// empty list refuses resolution.
    fn resolve_with_groups(
        &mut self,
        user: User,
        cached_groups: Option<Vec<Group>>,
        fetched_user: bool,
    ) -> Option<ResolvedUser> {
        let (mut groups, fetched_groups) = match cached_groups {
            Some(groups) => (groups, false),
            None => match self.source.user_groups(&user) {
                Ok(groups) => (groups, true),
                Err(e) => {
                    tracing::warn!(
                        user = %user.name,
                        error = %e,
                        "Group lookup against the directory failed"
                    );
                    return None;
                }
            },
        };

        self.append_default_group(&mut groups);

        if groups.is_empty() {
            tracing::warn!(user = %user.name, "User resolved with no groups, refusing entry");
            return None;
        }

        if fetched_user || fetched_groups {
            self.write_back(&user, &groups);
        }

        ResolvedUser::from_parts(user, groups)
    }

    /// Append the configured default group unless a group of that name is
    /// already in the list. Membership order stays untouched; the default
    /// always comes last.
    fn append_default_group(&self, groups: &mut Vec<Group>) {
        if groups.iter().any(|g| g.name == self.default_group) {
            return;
        }
        match idmap::map_name(&self.default_group, self.id_range) {
            Ok(gid) => groups.push(Group::new(self.default_group.clone(), gid)),
            Err(e) => {
                tracing::warn!(
                    group = %self.default_group,
                    error = %e,
                    "Default group does not map to a gid, skipping"
                );
            }
        }
    }

    /// Persist a freshly resolved user and its groups.
    ///
    /// Failures are logged and swallowed: the answer was already assembled
    /// and a cache that cannot accept it only costs a refetch later.
    fn write_back(&mut self, user: &User, groups: &[Group]) {
        let names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
        if let Err(e) = self.store.update_user(user, &names) {
            tracing::warn!(
                user = %user.name,
                error = %e,
                "Cache write-back of user failed"
            );
        }
        if let Err(e) = self.store.add_groups(groups) {
            tracing::warn!(
                user = %user.name,
                error = %e,
                "Cache write-back of groups failed"
            );
        }
    }
}
