//! In-process memory backend.

use crate::error::StorageResult;
use crate::traits::{DeleteOptions, KvStore, check_key};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::instrument;

/// Key-value store held in process memory.
///
/// Ordered so that `keys` returns lexicographic order like Consul does.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with string values.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Bytes::from(v.into())))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Copy of every entry, for inspection.
    pub async fn snapshot(&self) -> BTreeMap<String, Bytes> {
        self.entries.read().await.clone()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryBackend {
    #[instrument(skip(self), fields(backend = "memory"))]
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        check_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(backend = "memory", size = value.len()))]
    async fn set(&self, key: &str, value: Bytes) -> StorageResult<()> {
        check_key(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete(&self, key: &str, options: DeleteOptions) -> StorageResult<()> {
        check_key(key)?;
        let mut entries = self.entries.write().await;
        entries.remove(key);
        if options.recursive {
            let prefix = format!("{key}/");
            entries.retain(|k, _| !k.starts_with(&prefix));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryBackend::new();
        assert!(store.get("foo/active-revision").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_overwrites() {
        let store = MemoryBackend::new();
        store
            .set("foo/active-revision", Bytes::from_static(b"aaa"))
            .await
            .unwrap();
        store
            .set("foo/active-revision", Bytes::from_static(b"bbb"))
            .await
            .unwrap();
        assert_eq!(
            store.get("foo/active-revision").await.unwrap(),
            Some(Bytes::from_static(b"bbb"))
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn keys_filters_by_prefix_in_order() {
        let store = MemoryBackend::with_entries([
            ("foo/revisions/bbb", "2"),
            ("foo/revisions/aaa", "1"),
            ("foo/revisions/aaa/metadata", "{}"),
            ("foo/recent-revisions", "aaa,bbb"),
            ("bar/revisions/aaa", "x"),
        ]);

        let keys = store.keys("foo/revisions/").await.unwrap();
        assert_eq!(
            keys,
            vec![
                "foo/revisions/aaa",
                "foo/revisions/aaa/metadata",
                "foo/revisions/bbb"
            ]
        );
        assert!(store.keys("baz/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recursive_delete_spares_string_prefix_siblings() {
        let store = MemoryBackend::with_entries([
            ("foo/revisions/12", "a"),
            ("foo/revisions/12/metadata", "{}"),
            ("foo/revisions/12/aliases", "12"),
            ("foo/revisions/123", "b"),
            ("foo/revisions/123/metadata", "{}"),
        ]);

        store
            .delete("foo/revisions/12", DeleteOptions::recursive())
            .await
            .unwrap();

        let keys = store.keys("foo/").await.unwrap();
        assert_eq!(
            keys,
            vec!["foo/revisions/123", "foo/revisions/123/metadata"]
        );
    }

    #[tokio::test]
    async fn single_delete_keeps_descendants() {
        let store = MemoryBackend::with_entries([
            ("foo/revisions/12", "a"),
            ("foo/revisions/12/metadata", "{}"),
        ]);

        store
            .delete("foo/revisions/12", DeleteOptions::single())
            .await
            .unwrap();
        store
            .delete("foo/revisions/does-not-exist", DeleteOptions::single())
            .await
            .unwrap();

        assert_eq!(
            store.keys("foo/").await.unwrap(),
            vec!["foo/revisions/12/metadata"]
        );
    }

    #[tokio::test]
    async fn rejects_invalid_keys() {
        let store = MemoryBackend::new();
        assert!(store.set("", Bytes::new()).await.is_err());
        assert!(store.get("/foo").await.is_err());
    }
}
