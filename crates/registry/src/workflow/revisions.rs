use super::Deployer;
use crate::error::RegistryResult;
use serde::Serialize;

/// One entry of the recent-revisions list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevisionSummary {
    pub revision: String,
    pub active: bool,
}

impl Deployer {
    /// Recent revisions, newest first, flagged with whether each is active.
    pub async fn fetch_revisions(&self) -> RegistryResult<Vec<RevisionSummary>> {
        let (recent, active) = futures::try_join!(
            self.registry.recent_revision_keys(),
            self.registry.get_active_revision()
        )?;

        Ok(recent
            .into_iter()
            .map(|revision| RevisionSummary {
                active: active.as_deref() == Some(revision.as_str()),
                revision,
            })
            .collect())
    }
}
