//! Persistent identity cache.
//!
//! A [`CacheStore`] owns a single JSON document on disk holding users and
//! groups keyed by numeric id, plus in-memory name indices rebuilt on every
//! load. Reads are gated by a [`Ttl`]: records older than the window are
//! treated as absent so callers fall through to the directory source.

pub mod freshness;
pub mod index;
pub mod store;

pub use freshness::Ttl;
pub use index::CacheIndex;
pub use store::CacheStore;
