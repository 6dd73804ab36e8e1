use super::Deployer;
use crate::error::{Precondition, RegistryError, RegistryResult};
use kvdeploy_core::config::UploadConfig;
use serde::Serialize;

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub revision_key: String,
    /// Whether the key was newly added to the recent-revisions list.
    pub inserted: bool,
    /// Revisions dropped by retention, oldest first.
    pub removed: Vec<String>,
}

impl Deployer {
    /// Upload an artifact as a new revision.
    ///
    /// Refuses to replace an existing revision unless `allow_overwrite` is
    /// set. On success the revision heads the recent-revisions list, which is
    /// then trimmed to `max_revisions`.
    pub async fn upload(&self, config: &UploadConfig) -> RegistryResult<UploadOutcome> {
        config.validate()?;
        let revision_key = config.revision_key.as_str();
        let path = config.artifact_path();

        self.reporter
            .log(&format!("Uploading `{}`", path.display()), true);

        if !config.allow_overwrite && self.revision_exists(revision_key).await {
            return Err(Precondition::RevisionExists.into());
        }

        let content = self
            .artifacts
            .read(&path)
            .await
            .map_err(|source| RegistryError::InputNotFound {
                path: path.clone(),
                source,
            })?;

        self.registry.set_revision(revision_key, content).await?;
        self.registry
            .set_revision_metadata(revision_key, &config.metadata)
            .await?;

        self.link_aliases(revision_key, &config.aliases).await?;

        let inserted = self.registry.add_recent_revision(revision_key).await?;
        let removed = self
            .registry
            .trim_recent_revisions(config.max_revisions)
            .await?;

        let namespace = self.registry.namespace();
        for key in &removed {
            self.reporter.log(
                &format!("Removed revision `{key}` from namespace `{namespace}`"),
                true,
            );
        }
        self.reporter.log(
            &format!("Uploaded with key `{revision_key}` into namespace `{namespace}`"),
            false,
        );

        Ok(UploadOutcome {
            revision_key: revision_key.to_string(),
            inserted,
            removed,
        })
    }

    /// A failed lookup counts as "does not exist".
    async fn revision_exists(&self, revision_key: &str) -> bool {
        match self.registry.keys_for_revision(revision_key).await {
            Ok(keys) => !keys.is_empty(),
            Err(error) => {
                tracing::debug!(
                    revision_key,
                    %error,
                    "Existence check failed; treating revision as absent"
                );
                false
            }
        }
    }

    async fn link_aliases(&self, revision_key: &str, aliases: &[String]) -> RegistryResult<()> {
        if !self.registry.aliases_enabled() {
            if !aliases.is_empty() {
                tracing::warn!(
                    ?aliases,
                    "Aliases are disabled for this namespace; ignoring configured aliases"
                );
            }
            return Ok(());
        }

        self.registry.update_alias(revision_key, revision_key).await?;
        for alias_name in aliases.iter().filter(|name| *name != revision_key) {
            self.registry.update_alias(revision_key, alias_name).await?;
        }
        Ok(())
    }
}
