//! Revision registry over a namespaced KV key hierarchy.

use crate::error::{RegistryError, RegistryResult};
use crate::keys::KeyScheme;
use crate::list;
use bytes::Bytes;
use kvdeploy_core::config::RegistryConfig;
use kvdeploy_core::validate_revision_key;
use kvdeploy_storage::{DeleteOptions, KvStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Metadata stored next to a revision.
pub type RevisionMetadata = BTreeMap<String, Value>;

/// Read-modify-write operations on one namespace.
///
/// Holds no registry state of its own: every operation reads the store afresh.
#[derive(Clone)]
pub struct RevisionRegistry {
    pub(crate) store: Arc<dyn KvStore>,
    pub(crate) keys: KeyScheme,
    pub(crate) aliases_enabled: bool,
}

impl std::fmt::Debug for RevisionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionRegistry")
            .field("backend", &self.store.backend_name())
            .field("keys", &self.keys)
            .field("aliases_enabled", &self.aliases_enabled)
            .finish()
    }
}

impl RevisionRegistry {
    /// Create a registry after validating the namespace and key tokens.
    pub fn new(store: Arc<dyn KvStore>, config: &RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            keys: KeyScheme::new(config),
            aliases_enabled: config.aliases_enabled,
        })
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn aliases_enabled(&self) -> bool {
        self.aliases_enabled
    }

    /// Keys stored under a revision's content key. Used as an existence check.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn keys_for_revision(&self, revision_key: &str) -> RegistryResult<Vec<String>> {
        let root = self.keys.revision(revision_key);
        let keys = self.store.keys(&root).await?;
        Ok(keys
            .into_iter()
            .filter(|key| self.keys.belongs_to_revision(revision_key, key))
            .collect())
    }

    /// Write revision content. The content is an opaque blob.
    #[instrument(skip(self, content), fields(namespace = %self.namespace(), size = content.len()))]
    pub async fn set_revision(&self, revision_key: &str, content: Bytes) -> RegistryResult<()> {
        validate_revision_key(revision_key)?;
        self.store
            .set(&self.keys.revision(revision_key), content)
            .await?;
        Ok(())
    }

    /// Write revision metadata as canonical (key-sorted) JSON.
    #[instrument(skip(self, metadata), fields(namespace = %self.namespace()))]
    pub async fn set_revision_metadata(
        &self,
        revision_key: &str,
        metadata: &RevisionMetadata,
    ) -> RegistryResult<()> {
        validate_revision_key(revision_key)?;
        let json = serde_json::to_string(metadata).map_err(|e| RegistryError::Decode {
            key: self.keys.revision_metadata(revision_key),
            reason: e.to_string(),
        })?;
        self.store
            .set(&self.keys.revision_metadata(revision_key), Bytes::from(json))
            .await?;
        Ok(())
    }

    /// Read revision metadata, if any was written.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn revision_metadata(
        &self,
        revision_key: &str,
    ) -> RegistryResult<Option<RevisionMetadata>> {
        let key = self.keys.revision_metadata(revision_key);
        let Some(raw) = self.get_text(&key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RegistryError::Decode {
                key,
                reason: e.to_string(),
            })
    }

    /// Recent revision keys, newest first. Empty when the list was never written.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn recent_revision_keys(&self) -> RegistryResult<Vec<String>> {
        let raw = self.get_text(&self.keys.recent_revisions()).await?;
        Ok(raw.as_deref().map(list::decode).unwrap_or_default())
    }

    /// Replace the recent-revisions list. An empty list is written as an empty string.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn set_recent_revisions(&self, revision_keys: &[String]) -> RegistryResult<()> {
        self.store
            .set(
                &self.keys.recent_revisions(),
                Bytes::from(list::encode(revision_keys)),
            )
            .await?;
        Ok(())
    }

    /// Put a revision at the front of the recent list unless it is already listed.
    ///
    /// The list is written back either way. Returns whether the key was inserted.
    pub async fn add_recent_revision(&self, revision_key: &str) -> RegistryResult<bool> {
        let mut recent = self.recent_revision_keys().await?;
        let inserted = !recent.iter().any(|key| key == revision_key);
        if inserted {
            recent.insert(0, revision_key.to_string());
        }
        self.set_recent_revisions(&recent).await?;
        Ok(inserted)
    }

    /// Delete a revision's content, metadata and alias list.
    ///
    /// Alias keys that still resolve to the revision are removed first so no
    /// alias is left pointing at a deleted revision.
    pub async fn delete_revision(&self, revision_key: &str) -> RegistryResult<()> {
        validate_revision_key(revision_key)?;
        self.purge_revision(revision_key).await
    }

    /// [`Self::delete_revision`] for keys read back from the store, which are
    /// opaque and may not pass caller-side validation.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub(crate) async fn purge_revision(&self, revision_key: &str) -> RegistryResult<()> {
        if self.aliases_enabled {
            for alias_name in self.revision_aliases(revision_key).await? {
                if self.resolve_alias(&alias_name).await?.as_deref() == Some(revision_key) {
                    self.store
                        .delete(&self.keys.alias(&alias_name), DeleteOptions::single())
                        .await?;
                }
            }
        }
        self.store
            .delete(&self.keys.revision(revision_key), DeleteOptions::recursive())
            .await?;
        tracing::debug!(revision_key, "Deleted revision");
        Ok(())
    }

    /// Point the namespace at a revision. Membership in the recent list is
    /// checked by the activation workflow, not here.
    ///
    /// The key is stored as a value, never used as a path, so list entries
    /// written by other tools can be activated as-is.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn set_active_revision(&self, revision_key: &str) -> RegistryResult<()> {
        self.store
            .set(
                &self.keys.active_revision(),
                Bytes::from(revision_key.to_string()),
            )
            .await?;
        Ok(())
    }

    /// The active revision, or `None` if none was ever activated.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn get_active_revision(&self) -> RegistryResult<Option<String>> {
        let raw = self.get_text(&self.keys.active_revision()).await?;
        Ok(raw.filter(|value| !value.is_empty()))
    }

    /// Read a key that must hold UTF-8 text.
    pub(crate) async fn get_text(&self, key: &str) -> RegistryResult<Option<String>> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| RegistryError::Decode {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}
