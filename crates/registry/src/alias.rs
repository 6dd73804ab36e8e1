//! Alias bookkeeping.
//!
//! An alias is stored twice: `{ns}/aliases/{name}` holds the revision key it
//! resolves to, and the revision's own alias list names it. Moving an alias
//! updates both sides.

use crate::error::RegistryResult;
use crate::list;
use crate::registry::RevisionRegistry;
use bytes::Bytes;
use kvdeploy_core::{validate_alias_name, validate_revision_key};
use kvdeploy_storage::DeleteOptions;
use tracing::instrument;

impl RevisionRegistry {
    /// The revision an alias resolves to, if the alias exists.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn resolve_alias(&self, alias_name: &str) -> RegistryResult<Option<String>> {
        let raw = self.get_text(&self.keys.alias(alias_name)).await?;
        Ok(raw.filter(|value| !value.is_empty()))
    }

    /// Alias names recorded on a revision, in link order.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn revision_aliases(&self, revision_key: &str) -> RegistryResult<Vec<String>> {
        let raw = self
            .get_text(&self.keys.revision_aliases(revision_key))
            .await?;
        Ok(raw.as_deref().map(list::decode).unwrap_or_default())
    }

    /// Point `alias_name` at `revision_key`. Returns whether the alias was linked.
    ///
    /// If the alias previously resolved to another revision, the name is
    /// dropped from that revision's alias list first; the list key is deleted
    /// once empty. Re-linking an alias to the revision it already names leaves
    /// the store unchanged. Another revision's self alias is never moved: the
    /// call writes nothing and returns `false`.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn update_alias(&self, revision_key: &str, alias_name: &str) -> RegistryResult<bool> {
        validate_revision_key(revision_key)?;
        validate_alias_name(alias_name)?;

        let previous = self.resolve_alias(alias_name).await?;
        if let Some(previous) = previous.as_deref().filter(|p| *p != revision_key) {
            if previous == alias_name {
                tracing::warn!(
                    revision_key,
                    alias_name,
                    "Alias is the self alias of another revision; not moving it"
                );
                return Ok(false);
            }
            self.unlink_alias(previous, alias_name).await?;
        }

        let mut aliases = self.revision_aliases(revision_key).await?;
        if !aliases.iter().any(|name| name == alias_name) {
            aliases.push(alias_name.to_string());
        }
        self.store
            .set(
                &self.keys.revision_aliases(revision_key),
                Bytes::from(list::encode(&aliases)),
            )
            .await?;

        self.store
            .set(
                &self.keys.alias(alias_name),
                Bytes::from(revision_key.to_string()),
            )
            .await?;

        tracing::debug!(revision_key, alias_name, ?previous, "Linked alias");
        Ok(true)
    }

    async fn unlink_alias(&self, revision_key: &str, alias_name: &str) -> RegistryResult<()> {
        let aliases_key = self.keys.revision_aliases(revision_key);
        let remaining: Vec<String> = self
            .revision_aliases(revision_key)
            .await?
            .into_iter()
            .filter(|name| name != alias_name)
            .collect();

        if remaining.is_empty() {
            self.store
                .delete(&aliases_key, DeleteOptions::single())
                .await?;
        } else {
            self.store
                .set(&aliases_key, Bytes::from(list::encode(&remaining)))
                .await?;
        }
        Ok(())
    }
}
