//! Subcommand implementations.
//!
//! Every command works from the loaded configuration and the cache file
//! alone; none of them talks to a directory or writes the cache document.
//! Lookups go through the store's TTL-gated reads, so the answers match
//! what a resolver would accept from the cache.

use chrono::Utc;
use roster_cache::{CacheStore, Ttl};
use roster_core::{map_name, RosterConfig};
use serde_json::json;

use crate::error::CliError;

const LOOKUP_USAGE: &str = "lookup expects 'user' or 'group' and a name or id";

/// Dispatch a command line.
pub fn run(config: &RosterConfig, args: &[String]) -> Result<(), CliError> {
    let command = args.first().map(String::as_str).ok_or(CliError::Usage {
        message: "expected a command",
    })?;

    match command {
        "status" => status(config),
        "lookup" => lookup(config, &args[1..]),
        "map" => map_id(config, &args[1..]),
        "check-config" => check_config(config),
        other => Err(CliError::UnknownCommand {
            command: other.to_string(),
        }),
    }
}

/// Answer a lookup from the cache alone. Numeric keys query by id,
/// anything else by name.
pub fn lookup_value(
    store: &CacheStore,
    kind: &str,
    key: &str,
) -> Result<serde_json::Value, CliError> {
    match kind {
        "user" => {
            let found = match key.parse::<u64>() {
                Ok(uid) => store.user_by_uid(uid),
                Err(_) => store.user_by_name(key),
            };
            let (user, groups) = found.ok_or_else(|| CliError::NotFound {
                kind: "user",
                key: key.to_string(),
            })?;
            let group_names = groups
                .map(|groups| groups.into_iter().map(|g| g.name).collect::<Vec<_>>());
            Ok(json!({
                "username": user.name,
                "uid": user.uid,
                "groups": group_names,
            }))
        }
        "group" => {
            let found = match key.parse::<u64>() {
                Ok(gid) => store.group_by_gid(gid),
                Err(_) => store.group_by_name(key),
            };
            let group = found.ok_or_else(|| CliError::NotFound {
                kind: "group",
                key: key.to_string(),
            })?;
            Ok(json!({
                "groupname": group.name,
                "gid": group.gid,
            }))
        }
        _ => Err(CliError::Usage {
            message: LOOKUP_USAGE,
        }),
    }
}

fn status(config: &RosterConfig) -> Result<(), CliError> {
    let store = CacheStore::open(config);
    let ttl = store.ttl();
    let now = Utc::now().timestamp();

    println!("cache file:    {}", store.path().display());
    println!("ttl seconds:   {}", ttl.seconds());
    println!("cached users:  {}", store.user_count());
    println!("cached groups: {}", store.group_count());

    for (uid, record) in &store.document().users {
        println!(
            "user  {uid:>10}  {:<24} {}",
            record.name,
            freshness_label(ttl, record.last_synced, now)
        );
    }
    for (gid, record) in &store.document().groups {
        println!(
            "group {gid:>10}  {:<24} {}",
            record.name,
            freshness_label(ttl, record.last_synced, now)
        );
    }
    Ok(())
}

fn freshness_label(ttl: Ttl, last_synced: i64, now: i64) -> &'static str {
    if ttl.is_fresh(last_synced, now) {
        "fresh"
    } else {
        "stale"
    }
}

fn lookup(config: &RosterConfig, args: &[String]) -> Result<(), CliError> {
    let (kind, key) = match args {
        [kind, key] => (kind.as_str(), key.as_str()),
        _ => {
            return Err(CliError::Usage {
                message: LOOKUP_USAGE,
            })
        }
    };

    let store = CacheStore::open(config);
    let value = lookup_value(&store, kind, key)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn map_id(config: &RosterConfig, args: &[String]) -> Result<(), CliError> {
    let name = match args {
        [name] => name.as_str(),
        _ => {
            return Err(CliError::Usage {
                message: "map expects exactly one name",
            })
        }
    };

    let id = map_name(name, config.id_range)?;
    println!("{id}");
    Ok(())
}

fn check_config(config: &RosterConfig) -> Result<(), CliError> {
    // Loading already parsed and validated; report what took effect.
    println!("configuration ok");
    println!("cache file:    {}", config.cache_path.display());
    println!("ttl seconds:   {}", config.ttl_seconds);
    println!(
        "id range:      {}..={}",
        config.id_range.min, config.id_range.max
    );
    println!("default group: {}", config.default_group);
    Ok(())
}
