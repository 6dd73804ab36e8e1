//! Retention planning for the recent-revisions list.

use crate::error::RegistryResult;
use crate::registry::RevisionRegistry;
use futures::future::try_join_all;
use tracing::instrument;

/// Outcome of applying a retention limit to a recent-revisions list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    /// Entries to keep, most recent first.
    pub keep: Vec<String>,
    /// Entries to drop, oldest first.
    pub remove: Vec<String>,
}

impl RetentionPlan {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty()
    }
}

/// Plan which revisions to drop so that at most `max_revisions` remain.
///
/// Entries are removed from the oldest end. The active revision is never
/// removed; when it sits at the oldest end, the next oldest entries go in
/// its place.
pub fn plan_retention(
    recent: &[String],
    max_revisions: usize,
    active: Option<&str>,
) -> RetentionPlan {
    if recent.len() <= max_revisions {
        return RetentionPlan {
            keep: recent.to_vec(),
            remove: Vec::new(),
        };
    }

    let excess = recent.len() - max_revisions;
    let mut remove = Vec::with_capacity(excess);
    for key in recent.iter().rev() {
        if remove.len() == excess {
            break;
        }
        if Some(key.as_str()) == active {
            continue;
        }
        remove.push(key.clone());
    }

    let keep = recent
        .iter()
        .filter(|key| !remove.contains(key))
        .cloned()
        .collect();

    RetentionPlan { keep, remove }
}

impl RevisionRegistry {
    /// Cut the recent-revisions list down to `max_revisions` entries.
    ///
    /// The keep list is written before any revision is deleted. Deletions run
    /// concurrently. A listed revision with no stored keys is logged and
    /// skipped. Returns the entries dropped from the list, oldest first.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub async fn trim_recent_revisions(&self, max_revisions: usize) -> RegistryResult<Vec<String>> {
        let recent = self.recent_revision_keys().await?;
        if recent.len() <= max_revisions {
            return Ok(Vec::new());
        }

        let active = self.get_active_revision().await?;
        let plan = plan_retention(&recent, max_revisions, active.as_deref());
        if plan.is_noop() {
            return Ok(Vec::new());
        }

        self.set_recent_revisions(&plan.keep).await?;
        try_join_all(plan.remove.iter().map(|key| self.retire_revision(key))).await?;

        tracing::debug!(removed = ?plan.remove, "Trimmed recent revisions");
        Ok(plan.remove)
    }

    async fn retire_revision(&self, revision_key: &str) -> RegistryResult<()> {
        if self.keys_for_revision(revision_key).await?.is_empty() {
            tracing::warn!(
                revision_key,
                "Listed revision has no stored content; skipping delete"
            );
            return Ok(());
        }
        self.purge_revision(revision_key).await
    }
}
