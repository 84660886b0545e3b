//! Configuration types

use crate::error::ConfigError;
use crate::idmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Lowest id the deterministic mapper may produce. Everything below this is
/// reserved for locally administered accounts.
pub const MIN_ID_FLOOR: u64 = 1000;

/// TTL applied when the configured value is absent or unparsable.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Inclusive id range for deterministic name mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub min: u64,
    pub max: u64,
}

impl IdRange {
    /// Create a new id range. Bounds are checked by
    /// [`RosterConfig::validate`], not here, so tests can exercise the
    /// mapper with arbitrary ranges.
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

/// Master configuration for a cache-backed resolver session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Path of the persisted cache document.
    pub cache_path: PathBuf,

    /// Seconds before a cached record goes stale. Negative means records
    /// never expire; zero means every read bypasses the cache.
    pub ttl_seconds: i64,

    /// Range deterministic ids are mapped into.
    pub id_range: IdRange,

    /// Group every resolved user belongs to, appended after the directory's
    /// own memberships.
    pub default_group: String,
}

impl RosterConfig {
    /// Build a configuration from the flat key/value view a host hands over.
    ///
    /// Required keys: `cache_path`, `min_id`, `max_id`, `default_group`.
    /// `cache_ttl_seconds` is optional; an absent or unparsable value falls
    /// back to [`DEFAULT_TTL_SECS`] with a logged warning rather than
    /// failing, so a typo in the TTL never takes identity resolution down.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let cache_path = values
            .get("cache_path")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "cache_path".to_string(),
            })?;

        let ttl_seconds = match values.get("cache_ttl_seconds") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_TTL_SECS,
                        "Unparsable cache_ttl_seconds, using default"
                    );
                    DEFAULT_TTL_SECS
                }
            },
            None => {
                tracing::warn!(
                    default = DEFAULT_TTL_SECS,
                    "cache_ttl_seconds not configured, using default"
                );
                DEFAULT_TTL_SECS
            }
        };

        let min_id = required_id(values, "min_id")?;
        let max_id = required_id(values, "max_id")?;

        let default_group = values
            .get("default_group")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "default_group".to_string(),
            })?;

        let config = Self {
            cache_path: PathBuf::from(cache_path),
            ttl_seconds,
            id_range: IdRange::new(min_id, max_id),
            default_group: default_group.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ROSTER_CACHE_PATH`: path of the persisted cache document
    /// - `ROSTER_CACHE_TTL_SECONDS`: record TTL in seconds
    /// - `ROSTER_MIN_ID`: lower bound of the deterministic id range
    /// - `ROSTER_MAX_ID`: upper bound of the deterministic id range
    /// - `ROSTER_DEFAULT_GROUP`: group appended to every resolved user
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for key in [
            "cache_path",
            "cache_ttl_seconds",
            "min_id",
            "max_id",
            "default_group",
        ] {
            let var = format!("ROSTER_{}", key.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                values.insert(key.to_string(), value);
            }
        }
        Self::from_values(&values)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - cache_path is non-empty
    /// - min_id >= [`MIN_ID_FLOOR`]
    /// - max_id > min_id
    /// - default_group maps to a gid inside the configured range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "cache_path".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.id_range.min < MIN_ID_FLOOR {
            return Err(ConfigError::InvalidValue {
                key: "min_id".to_string(),
                value: self.id_range.min.to_string(),
                reason: format!("must be at least {}", MIN_ID_FLOOR),
            });
        }

        if self.id_range.max <= self.id_range.min {
            return Err(ConfigError::InvalidValue {
                key: "max_id".to_string(),
                value: self.id_range.max.to_string(),
                reason: "must be greater than min_id".to_string(),
            });
        }

        if let Err(e) = idmap::map_name(&self.default_group, self.id_range) {
            return Err(ConfigError::InvalidValue {
                key: "default_group".to_string(),
                value: self.default_group.clone(),
                reason: format!("not mappable to a gid: {}", e),
            });
        }

        Ok(())
    }
}

fn required_id(values: &HashMap<String, String>, key: &str) -> Result<u64, ConfigError> {
    let raw = values.get(key).ok_or_else(|| ConfigError::MissingRequired {
        key: key.to_string(),
    })?;
    raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.clone(),
        reason: "must be an unsigned integer".to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_values() -> HashMap<String, String> {
        let mut values = HashMap::new();
        values.insert("cache_path".to_string(), "/var/cache/roster.json".to_string());
        values.insert("cache_ttl_seconds".to_string(), "600".to_string());
        values.insert("min_id".to_string(), "2000200001".to_string());
        values.insert("max_id".to_string(), "4294967294".to_string());
        values.insert("default_group".to_string(), "users".to_string());
        values
    }

    #[test]
    fn test_from_values_complete() {
        let config = RosterConfig::from_values(&base_values()).unwrap();
        assert_eq!(config.cache_path, PathBuf::from("/var/cache/roster.json"));
        assert_eq!(config.ttl_seconds, 600);
        assert_eq!(config.id_range, IdRange::new(2000200001, 4294967294));
        assert_eq!(config.default_group, "users");
    }

    #[test]
    fn test_from_values_missing_cache_path() {
        let mut values = base_values();
        values.remove("cache_path");
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                key: "cache_path".to_string()
            }
        );
    }

    #[test]
    fn test_from_values_absent_ttl_uses_default() {
        let mut values = base_values();
        values.remove("cache_ttl_seconds");
        let config = RosterConfig::from_values(&values).unwrap();
        assert_eq!(config.ttl_seconds, DEFAULT_TTL_SECS);
    }

    #[test]
    fn test_from_values_unparsable_ttl_uses_default() {
        let mut values = base_values();
        values.insert("cache_ttl_seconds".to_string(), "an hour".to_string());
        let config = RosterConfig::from_values(&values).unwrap();
        assert_eq!(config.ttl_seconds, DEFAULT_TTL_SECS);
    }

    #[test]
    fn test_from_values_negative_ttl_preserved() {
        let mut values = base_values();
        values.insert("cache_ttl_seconds".to_string(), "-1".to_string());
        let config = RosterConfig::from_values(&values).unwrap();
        assert_eq!(config.ttl_seconds, -1);
    }

    #[test]
    fn test_from_values_min_id_below_floor_rejected() {
        let mut values = base_values();
        values.insert("min_id".to_string(), "999".to_string());
        values.insert("max_id".to_string(), "5000".to_string());
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "min_id"));
    }

    #[test]
    fn test_from_values_max_not_above_min_rejected() {
        let mut values = base_values();
        values.insert("min_id".to_string(), "2000".to_string());
        values.insert("max_id".to_string(), "2000".to_string());
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "max_id"));
    }

    #[test]
    fn test_from_values_non_numeric_min_id_rejected() {
        let mut values = base_values();
        values.insert("min_id".to_string(), "one thousand".to_string());
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "min_id"));
    }

    #[test]
    fn test_validate_unmappable_default_group_rejected() {
        let mut values = base_values();
        values.insert("default_group".to_string(), "dev-ops".to_string());
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "default_group"));
    }

    #[test]
    fn test_validate_default_group_outside_range_rejected() {
        let mut values = base_values();
        // "z" maps to 26 + 999 = 1025, past the configured max of 1010.
        values.insert("min_id".to_string(), "1000".to_string());
        values.insert("max_id".to_string(), "1010".to_string());
        values.insert("default_group".to_string(), "z".to_string());
        let err = RosterConfig::from_values(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "default_group"));
    }

    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let original = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_deref() {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    // The only test touching ROSTER_* variables, so parallel runs never race.
    #[test]
    fn test_from_env_reads_roster_variables() {
        let _path = EnvVarGuard::set("ROSTER_CACHE_PATH", "/var/cache/roster.json");
        let _ttl = EnvVarGuard::set("ROSTER_CACHE_TTL_SECONDS", "900");
        let _min = EnvVarGuard::set("ROSTER_MIN_ID", "2000200001");
        let _max = EnvVarGuard::set("ROSTER_MAX_ID", "4294967294");
        let _group = EnvVarGuard::set("ROSTER_DEFAULT_GROUP", "users");

        let config = RosterConfig::from_env().unwrap();
        assert_eq!(config.cache_path, PathBuf::from("/var/cache/roster.json"));
        assert_eq!(config.ttl_seconds, 900);
        assert_eq!(config.id_range, IdRange::new(2000200001, 4294967294));
        assert_eq!(config.default_group, "users");
    }
}
