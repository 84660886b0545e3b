//! Resolved account entries.
//!
//! A [`ResolvedUser`] is the fully-assembled answer to a user query: the
//! directory identity plus the synthesized account fields a consumer needs
//! to admit the user onto a host. Group queries return plain
//! [`Group`](roster_core::types::Group) records and need no wrapper.

use roster_core::types::{Group, User};
use serde::Serialize;

/// Login shell assigned to every resolved account.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// A user resolved to a complete account entry.
///
/// `groups` preserves directory precedence order; the first group is the
/// primary group and `primary_gid` always equals `groups[0].gid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUser {
    pub name: String,
    pub uid: u64,
    pub primary_gid: u64,
    pub gecos: String,
    pub home_dir: String,
    pub shell: String,
    pub groups: Vec<Group>,
}

impl ResolvedUser {
    /// Assemble an entry from an identity and its ordered group list.
    ///
    /// Returns `None` when the group list is empty: an account without a
    /// primary group cannot be admitted.
    pub fn from_parts(user: User, groups: Vec<Group>) -> Option<Self> {
        let primary_gid = groups.first()?.gid;
        let home_dir = format!("/home/{}", user.name);
        Some(ResolvedUser {
            name: user.name,
            uid: user.uid,
            primary_gid,
            gecos: String::new(),
            home_dir,
            shell: DEFAULT_SHELL.to_string(),
            groups,
        })
    }

    /// Group names in precedence order.
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_synthesizes_account_fields() {
        let user = User::new("alice", 2000200027);
        let groups = vec![
            Group::new("engineering", 2000204664),
            Group::new("everyone", 2000300000),
        ];

        let entry = ResolvedUser::from_parts(user, groups).unwrap();

        assert_eq!(entry.name, "alice");
        assert_eq!(entry.uid, 2000200027);
        assert_eq!(entry.primary_gid, 2000204664);
        assert_eq!(entry.gecos, "");
        assert_eq!(entry.home_dir, "/home/alice");
        assert_eq!(entry.shell, DEFAULT_SHELL);
        assert_eq!(entry.group_names(), vec!["engineering", "everyone"]);
    }

    #[test]
    fn test_from_parts_rejects_empty_group_list() {
        let user = User::new("alice", 2000200027);
        assert_eq!(ResolvedUser::from_parts(user, Vec::new()), None);
    }

    #[test]
    fn test_primary_gid_tracks_first_group() {
        let user = User::new("bob", 2000200055);
        let groups = vec![
            Group::new("ops", 2000207777),
            Group::new("engineering", 2000204664),
        ];

        let entry = ResolvedUser::from_parts(user, groups).unwrap();
        assert_eq!(entry.primary_gid, entry.groups[0].gid);
    }
}
