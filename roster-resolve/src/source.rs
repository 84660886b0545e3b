//! Directory source abstraction.
//!
//! The resolver never talks to a directory service directly. It goes through
//! [`DirectorySource`], which models the four queries the upstream must
//! answer, and [`Authenticator`], which models credential checks. Production
//! code implements these over LDAP or a local passwd database; tests plug in
//! scripted mocks.

use roster_core::error::SourceError;
use roster_core::types::{Group, User};

/// Upstream identity directory.
///
/// All methods fail with [`SourceError`] when the directory is unreachable
/// or rejects the query. The resolver treats every error as a miss, so
/// implementations should not retry internally unless the transport
/// requires it.
pub trait DirectorySource: Send + Sync {
    /// Look up a single user by login name.
    ///
    /// Returns `Ok(None)` when the directory is healthy but has no such
    /// user. That outcome is terminal for a lookup; only errors are logged.
    fn user(&self, name: &str) -> Result<Option<User>, SourceError>;

    /// Enumerate every user the directory knows about.
    fn all_users(&self) -> Result<Vec<User>, SourceError>;

    /// List the groups a user belongs to, in directory precedence order.
    ///
    /// The first entry is the user's primary group. Order is preserved all
    /// the way to the resolved entry, so implementations must return a
    /// stable ordering.
    fn user_groups(&self, user: &User) -> Result<Vec<Group>, SourceError>;

    /// Enumerate every group the directory knows about.
    fn all_groups(&self) -> Result<Vec<Group>, SourceError>;
}

/// Credential verification against the upstream directory.
pub trait Authenticator: Send + Sync {
    /// Check a username/secret pair.
    ///
    /// `Ok(false)` means the directory answered and rejected the pair.
    /// `Err` means the check could not be performed at all.
    fn authenticate(&self, username: &str, secret: &str) -> Result<bool, SourceError>;
}

/// Verify credentials, collapsing source failures into a rejection.
///
/// Authentication is pass/fail at the boundary: a directory that cannot be
/// reached must not let anyone in. The underlying error is logged before
/// being swallowed.
pub fn verify_credentials<A: Authenticator>(authenticator: &A, username: &str, secret: &str) -> bool {
    match authenticator.authenticate(username, secret) {
        Ok(accepted) => accepted,
        Err(e) => {
            tracing::warn!(username = %username, error = %e, "Authentication check failed, rejecting");
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
