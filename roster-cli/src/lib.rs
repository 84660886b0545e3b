//! Command line inspector for the roster identity cache.
//!
//! Every subcommand reports what the configuration and the cache file
//! currently hold; none of them contacts a directory or writes the cache
//! document, so the tool is safe to run next to a live resolver.

pub mod commands;
pub mod config;
pub mod error;

pub use error::CliError;
