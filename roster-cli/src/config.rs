//! Configuration file loading for the command line.
//!
//! The file is flat TOML carrying the same keys the library's
//! [`RosterConfig::from_values`] accepts, so the TTL fallback and range
//! validation behave identically no matter how the configuration arrives.
//! The path comes from `--config` or the `ROSTER_CONFIG` environment
//! variable, in that order.

use roster_core::RosterConfig;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Keys a configuration file may carry. Anything else is rejected rather
/// than silently ignored.
const KNOWN_KEYS: [&str; 5] = [
    "cache_path",
    "cache_ttl_seconds",
    "min_id",
    "max_id",
    "default_group",
];

/// Resolve the configuration path and load it.
pub fn load(flag_path: Option<PathBuf>) -> Result<RosterConfig, CliError> {
    let path = flag_path
        .or_else(path_from_env)
        .ok_or(CliError::MissingConfigPath)?;
    from_path(&path)
}

/// Load and validate a configuration file.
pub fn from_path(path: &Path) -> Result<RosterConfig, CliError> {
    let contents = fs::read_to_string(path)?;
    from_toml_str(&contents)
}

/// Parse flat TOML into a validated configuration.
pub fn from_toml_str(contents: &str) -> Result<RosterConfig, CliError> {
    let table: toml::Table = toml::from_str(contents)?;

    let mut values = HashMap::new();
    for (key, value) in table {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            return Err(CliError::UnknownKey { key });
        }
        let raw = match value {
            toml::Value::String(s) => s,
            other => other.to_string(),
        };
        values.insert(key, raw);
    }

    Ok(RosterConfig::from_values(&values)?)
}

fn path_from_env() -> Option<PathBuf> {
    std::env::var("ROSTER_CONFIG").ok().map(PathBuf::from)
}

// ============================================================================
// TESTS
// ============================================================================
