use super::Deployer;
use crate::error::{Precondition, RegistryResult};
use kvdeploy_core::config::ActivationConfig;

impl Deployer {
    /// Mark a revision from the recent-revisions list as active.
    ///
    /// Returns the activated revision key.
    pub async fn activate(&self, config: &ActivationConfig) -> RegistryResult<String> {
        let revision_key = config
            .requested_key()
            .ok_or(Precondition::MissingActivationKey)?;
        let namespace = self.registry.namespace();

        self.reporter.log(
            &format!("Activating revision `{revision_key}` in namespace `{namespace}`"),
            true,
        );

        let recent = self.registry.recent_revision_keys().await?;
        if recent.is_empty() {
            return Err(Precondition::NoRecentRevisions.into());
        }
        if !recent.iter().any(|key| key == revision_key) {
            return Err(Precondition::UnknownRevision.into());
        }

        self.registry.set_active_revision(revision_key).await?;

        self.reporter.log(
            &format!("✔ Activated revision `{revision_key}` in namespace `{namespace}`"),
            false,
        );
        Ok(revision_key.to_string())
    }
}
