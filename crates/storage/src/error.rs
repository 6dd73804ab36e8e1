//! Storage error types.

use thiserror::Error;

/// KV store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from {backend} ({status}): {body}")]
    UnexpectedStatus {
        backend: &'static str,
        status: u16,
        body: String,
    },

    #[error("write rejected for key: {0}")]
    WriteRejected(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
