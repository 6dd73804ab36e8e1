//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid revision key: {0}")]
    InvalidRevisionKey(String),

    #[error("invalid alias name: {0}")]
    InvalidAliasName(String),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
