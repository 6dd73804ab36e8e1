//! Storage trait definitions.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;

/// Options for delete operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Also delete every key below `key/`.
    pub recursive: bool,
}

impl DeleteOptions {
    /// Delete only the named key.
    pub const fn single() -> Self {
        Self { recursive: false }
    }

    /// Delete the named key and all its descendants.
    pub const fn recursive() -> Self {
        Self { recursive: true }
    }
}

/// Hierarchical key-value store.
///
/// Keys are `/`-separated paths. Implementations never retry on their own
/// behalf of the caller beyond what the transport does.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Read a value. Returns `None` when the key does not exist.
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Bytes) -> StorageResult<()>;

    /// List keys starting with `prefix`, in lexicographic order.
    /// Returns an empty list when nothing matches.
    async fn keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Delete a key, and with `recursive` every key below `key/`.
    /// Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str, options: DeleteOptions) -> StorageResult<()>;

    /// Get the name of this backend.
    ///
    /// Returns a static identifier (e.g., "consul", "memory") for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity.
    ///
    /// The default implementation returns Ok(()), suitable for backends that
    /// need no connectivity check.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Reject keys that cannot be addressed as a path.
pub(crate) fn check_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".to_string()));
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "key must not start or end with '/': {key}"
        )));
    }
    Ok(())
}
