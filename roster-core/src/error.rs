//! Error types for roster operations

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: {value} - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Cache persistence errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Cache file {path} is not a valid cache document: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Failed to write cache file {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Failed to replace cache file {path}: {reason}")]
    ReplaceFailed { path: String, reason: String },
}

/// Deterministic name mapping errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Cannot map an empty name")]
    EmptyName,

    #[error("Name {name} is longer than {max_len} characters")]
    NameTooLong { name: String, max_len: usize },

    #[error("Invalid character {character:?} in name {name}: only letters a-z map to ids")]
    InvalidCharacter { name: String, character: char },

    #[error("Mapped value {value} for name {name} is larger than max id {max}")]
    OutOfRange { name: String, value: u128, max: u64 },
}

/// Failures reported by the external directory source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Directory query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Credential check failed: {reason}")]
    AuthFailed { reason: String },
}

/// Master error type for all roster operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Mapping error: {0}")]
    Map(#[from] MapError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

// =============================================================================
// TESTS
// =============================================================================
