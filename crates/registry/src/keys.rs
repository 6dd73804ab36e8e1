//! Namespaced key layout.
//!
//! ```text
//! {ns}/revisions/{rev}            content
//! {ns}/revisions/{rev}/metadata   JSON metadata
//! {ns}/revisions/{rev}/aliases    comma-joined alias names
//! {ns}/{recent token}             comma-joined revision keys, newest first
//! {ns}/{active token}             active revision key
//! {ns}/aliases/{name}             revision key the alias resolves to
//! ```

use kvdeploy_core::config::RegistryConfig;

/// Builds every KV key the registry touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyScheme {
    namespace: String,
    recent_revisions_token: String,
    active_revision_token: String,
}

impl KeyScheme {
    /// Key scheme for a validated registry configuration.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            recent_revisions_token: config.recent_revisions_token.clone(),
            active_revision_token: config.active_revision_token.clone(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Content key of a revision; also the root of its key subtree.
    pub fn revision(&self, revision_key: &str) -> String {
        format!("{}/revisions/{revision_key}", self.namespace)
    }

    pub fn revision_metadata(&self, revision_key: &str) -> String {
        format!("{}/metadata", self.revision(revision_key))
    }

    pub fn revision_aliases(&self, revision_key: &str) -> String {
        format!("{}/aliases", self.revision(revision_key))
    }

    pub fn recent_revisions(&self) -> String {
        format!("{}/{}", self.namespace, self.recent_revisions_token)
    }

    pub fn active_revision(&self) -> String {
        format!("{}/{}", self.namespace, self.active_revision_token)
    }

    pub fn alias(&self, alias_name: &str) -> String {
        format!("{}/aliases/{alias_name}", self.namespace)
    }

    /// Whether `key` is the content key of `revision_key` or lies below it.
    pub fn belongs_to_revision(&self, revision_key: &str, key: &str) -> bool {
        let root = self.revision(revision_key);
        match key.strip_prefix(root.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
