//! Key-value store abstraction and backends for kvdeploy.
//!
//! This crate provides:
//! - The `KvStore` trait consumed by the revision registry
//! - A Consul HTTP KV backend
//! - An in-memory backend for dry runs and tests

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{consul::ConsulBackend, memory::MemoryBackend};
pub use error::{StorageError, StorageResult};
pub use traits::{DeleteOptions, KvStore};

use kvdeploy_core::config::StoreConfig;
use std::sync::Arc;

/// Create a KV store from configuration.
pub fn from_config(config: &StoreConfig) -> StorageResult<Arc<dyn KvStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StoreConfig::Consul {
            token, datacenter, ..
        } => {
            let base_url = config
                .consul_base_url()
                .ok_or_else(|| StorageError::Config("missing consul address".to_string()))?;
            let backend =
                ConsulBackend::new(&base_url, token.clone(), datacenter.clone(), config.timeout())?;
            tracing::debug!(base_url = %base_url, "Using consul KV backend");
            Ok(Arc::new(backend))
        }
        StoreConfig::Memory => {
            tracing::debug!("Using in-memory KV backend");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
