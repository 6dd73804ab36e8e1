//! Revision registry and deployment workflows for kvdeploy.
//!
//! A namespace in the KV store holds uploaded revisions, a most-recent-first
//! list of revision keys, an active-revision pointer and named aliases.
//! [`RevisionRegistry`] owns that key layout; [`Deployer`] runs the upload,
//! activate and listing workflows on top of it.

pub mod alias;
pub mod artifact;
pub mod error;
pub mod keys;
pub mod list;
pub mod registry;
pub mod reporter;
pub mod retention;
pub mod workflow;

pub use artifact::{ArtifactSource, FilesystemArtifacts};
pub use error::{Precondition, RegistryError, RegistryResult};
pub use keys::KeyScheme;
pub use registry::{RevisionMetadata, RevisionRegistry};
pub use reporter::{Reporter, TracingReporter};
pub use retention::{RetentionPlan, plan_retention};
pub use workflow::{Deployer, RevisionSummary, UploadOutcome};
