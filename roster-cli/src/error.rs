//! Errors surfaced by the command line.

use roster_core::{ConfigError, MapError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing configuration file path (use --config or ROSTER_CONFIG)")]
    MissingConfigPath,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown configuration key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Name does not map to an id: {0}")]
    Map(#[from] MapError),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No cached {kind} matching '{key}'")]
    NotFound { kind: &'static str, key: String },

    #[error("Usage: {message}")]
    Usage { message: &'static str },

    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },
}

// ============================================================================
// TESTS
// ============================================================================
