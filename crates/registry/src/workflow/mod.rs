//! Deployment workflows: upload, activate and revision listing.

mod activate;
mod revisions;
mod upload;

pub use revisions::RevisionSummary;
pub use upload::UploadOutcome;

use crate::artifact::{ArtifactSource, FilesystemArtifacts};
use crate::registry::RevisionRegistry;
use crate::reporter::{Reporter, TracingReporter};
use std::sync::Arc;

/// Runs workflows against a registry.
#[derive(Clone)]
pub struct Deployer {
    registry: RevisionRegistry,
    artifacts: Arc<dyn ArtifactSource>,
    reporter: Arc<dyn Reporter>,
}

impl Deployer {
    /// Deployer reading artifacts from the filesystem and reporting via `tracing`.
    pub fn new(registry: RevisionRegistry) -> Self {
        Self {
            registry,
            artifacts: Arc::new(FilesystemArtifacts),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Arc<dyn ArtifactSource>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn registry(&self) -> &RevisionRegistry {
        &self.registry
    }
}
