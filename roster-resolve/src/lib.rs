//! Read-through identity resolution over the roster cache.
//!
//! This crate connects the persistent cache to an upstream directory:
//! [`Resolver`] serves the four query shapes (user by name or uid, group
//! by name or gid) cache-first with write-back, [`source`] defines the
//! directory abstraction, and [`entry`] assembles complete account
//! entries. [`MockDirectory`] is the in-memory source used across the
//! workspace's tests.

pub mod entry;
pub mod mock;
pub mod resolver;
pub mod source;

pub use entry::{ResolvedUser, DEFAULT_SHELL};
pub use mock::{CallCounts, MockDirectory};
pub use resolver::Resolver;
pub use source::{verify_credentials, Authenticator, DirectorySource};
