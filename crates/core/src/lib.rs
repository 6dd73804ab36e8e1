//! Core domain types and shared configuration for kvdeploy.
//!
//! This crate defines what every other crate agrees on:
//! - Revision key, alias name and namespace validation
//! - Store, registry, upload and activation configuration
//! - The core error type

pub mod config;
pub mod error;
pub mod revision;

pub use error::{Error, Result};
pub use revision::{validate_alias_name, validate_namespace, validate_revision_key};

/// Default number of revisions kept in the recent-revisions list.
pub const DEFAULT_MAX_REVISIONS: usize = 10;

/// Default key token for the recent-revisions list.
pub const DEFAULT_RECENT_REVISIONS_TOKEN: &str = "recent-revisions";

/// Default key token for the active-revision pointer.
pub const DEFAULT_ACTIVE_REVISION_TOKEN: &str = "active-revision";
