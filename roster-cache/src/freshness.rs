//! Record freshness policy.
//!
//! A cached record is served only while it is fresh under the configured
//! TTL; a stale record is reported exactly like an absent one, which is
//! what pushes the resolver back to the directory source.

/// Time-to-live policy for cached records.
///
/// Negative seconds mean records never expire. Zero means every record is
/// already stale, so each read goes back to the source. Positive seconds
/// bound the age: a record is fresh strictly less than that many seconds
/// after it was written, so a record sitting exactly on the boundary is
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl {
    seconds: i64,
}

impl Ttl {
    /// Create a TTL from a signed second count.
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// The configured second count, sign intact.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// True when records under this policy never expire.
    pub fn never_expires(&self) -> bool {
        self.seconds < 0
    }

    /// True while a record written at `last_synced` is still fresh at
    /// `now` (both in seconds since the Unix epoch).
    pub fn is_fresh(&self, last_synced: i64, now: i64) -> bool {
        if self.seconds < 0 {
            return true;
        }
        now.saturating_sub(last_synced) < self.seconds
    }
}

// =============================================================================
// TESTS
// =============================================================================
