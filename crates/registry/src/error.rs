//! Registry and workflow error types.

use kvdeploy_storage::StorageError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A workflow gate that did not hold.
///
/// The display strings are user-facing and stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precondition {
    /// The revision already has keys and overwriting is disallowed.
    RevisionExists,
    /// Activation was requested without a revision key.
    MissingActivationKey,
    /// The revision to activate is not in the recent-revisions list.
    UnknownRevision,
    /// Activation was requested but the recent-revisions list is empty.
    NoRecentRevisions,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::RevisionExists => "Revision already exists",
            Self::MissingActivationKey => "Revision key to activate must be provided",
            Self::UnknownRevision => "Unknown revision key",
            Self::NoRecentRevisions => "No recent revisions found",
        };
        f.write_str(message)
    }
}

/// Registry operation errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    PreconditionFailed(Precondition),

    #[error("No file found at `{}`", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// KV store failure, passed through unchanged.
    #[error(transparent)]
    Upstream(#[from] StorageError),

    #[error(transparent)]
    InvalidKey(#[from] kvdeploy_core::Error),

    #[error("invalid value at {key}: {reason}")]
    Decode { key: String, reason: String },
}

impl From<Precondition> for RegistryError {
    fn from(precondition: Precondition) -> Self {
        Self::PreconditionFailed(precondition)
    }
}

impl RegistryError {
    /// The failed precondition, if this is a precondition failure.
    pub fn precondition(&self) -> Option<Precondition> {
        match self {
            Self::PreconditionFailed(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether the error came from the KV store rather than the registry itself.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
