//! Roster Core - Identity Types, Configuration, and Id Mapping
//!
//! Shared foundation for the roster identity cache: the persisted record
//! types, the error taxonomy, typed configuration, and the deterministic
//! name-to-id mapper. Persistence lives in roster-cache and read-through
//! resolution in roster-resolve.

pub mod config;
pub mod error;
pub mod idmap;
pub mod types;

pub use config::{IdRange, RosterConfig, DEFAULT_TTL_SECS, MIN_ID_FLOOR};
pub use error::{
    CacheError, ConfigError, MapError, RosterError, RosterResult, SourceError,
};
pub use idmap::{map_name, MAX_NAME_LEN};
pub use types::{CacheDocument, CachedGroup, CachedUser, Group, User};
