//! Configuration types shared across crates.
//!
//! Every field has a concrete default so a configuration is fully resolved
//! once it has been deserialized; nothing is computed lazily later on.

use crate::error::{Error, Result};
use crate::revision::{validate_alias_name, validate_namespace, validate_revision_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// KV store backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Consul KV over HTTP.
    Consul {
        /// Agent host name.
        #[serde(default = "default_consul_host")]
        host: String,
        /// Agent HTTP port.
        #[serde(default = "default_consul_port")]
        port: u16,
        /// Use https instead of http.
        #[serde(default = "default_consul_secure")]
        secure: bool,
        /// ACL token sent as `X-Consul-Token`.
        /// WARNING: Prefer KVDEPLOY_STORE__TOKEN over storing the token in a config file.
        #[serde(default)]
        token: Option<String>,
        /// Datacenter to target (agent default if unset).
        #[serde(default)]
        datacenter: Option<String>,
        /// Per-request timeout in seconds.
        #[serde(default = "default_consul_timeout_secs")]
        timeout_secs: u64,
    },
    /// Process-local store. Nothing survives the process; useful for dry runs.
    Memory,
}

fn default_consul_host() -> String {
    "localhost".to_string()
}

fn default_consul_port() -> u16 {
    8500
}

fn default_consul_secure() -> bool {
    true
}

fn default_consul_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Consul {
            host: default_consul_host(),
            port: default_consul_port(),
            secure: default_consul_secure(),
            token: None,
            datacenter: None,
            timeout_secs: default_consul_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Validate store configuration invariants.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            StoreConfig::Consul {
                host, timeout_secs, ..
            } => {
                if host.trim().is_empty() {
                    return Err("consul config requires a non-empty host".to_string());
                }
                if *timeout_secs == 0 {
                    return Err("consul timeout_secs must be at least 1".to_string());
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Base URL of the Consul HTTP API, if this is a Consul configuration.
    pub fn consul_base_url(&self) -> Option<String> {
        match self {
            StoreConfig::Consul {
                host, port, secure, ..
            } => {
                let scheme = if *secure { "https" } else { "http" };
                Some(format!("{scheme}://{host}:{port}"))
            }
            StoreConfig::Memory => None,
        }
    }

    /// Request timeout for network backends.
    pub fn timeout(&self) -> Duration {
        match self {
            StoreConfig::Consul { timeout_secs, .. } => Duration::from_secs(*timeout_secs),
            StoreConfig::Memory => Duration::from_secs(default_consul_timeout_secs()),
        }
    }
}

/// Key layout and behaviour of the revision registry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Namespace that prefixes every key of one deployment.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Key token of the recent-revisions list under the namespace.
    #[serde(default = "default_recent_revisions_token")]
    pub recent_revisions_token: String,
    /// Key token of the active-revision pointer under the namespace.
    #[serde(default = "default_active_revision_token")]
    pub active_revision_token: String,
    /// Maintain alias links during upload (default: true).
    #[serde(default = "default_aliases_enabled")]
    pub aliases_enabled: bool,
}

fn default_namespace() -> String {
    "missing-namespace".to_string()
}

fn default_recent_revisions_token() -> String {
    crate::DEFAULT_RECENT_REVISIONS_TOKEN.to_string()
}

fn default_active_revision_token() -> String {
    crate::DEFAULT_ACTIVE_REVISION_TOKEN.to_string()
}

fn default_aliases_enabled() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            recent_revisions_token: default_recent_revisions_token(),
            active_revision_token: default_active_revision_token(),
            aliases_enabled: default_aliases_enabled(),
        }
    }
}

impl RegistryConfig {
    /// Registry configuration for a namespace with default tokens.
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Validate the namespace and key tokens.
    pub fn validate(&self) -> Result<()> {
        validate_namespace(&self.namespace)?;
        for (name, token) in [
            ("recent_revisions_token", &self.recent_revisions_token),
            ("active_revision_token", &self.active_revision_token),
        ] {
            if token.is_empty() || token.contains('/') {
                return Err(Error::Config(format!(
                    "{name} must be a single non-empty key segment, got {token:?}"
                )));
            }
        }
        if self.recent_revisions_token == self.active_revision_token {
            return Err(Error::Config(
                "recent_revisions_token and active_revision_token must differ".to_string(),
            ));
        }
        // "revisions" and "aliases" are owned by the per-revision and alias key trees.
        for token in [&self.recent_revisions_token, &self.active_revision_token] {
            if token == "revisions" || token == "aliases" {
                return Err(Error::Config(format!("key token {token:?} is reserved")));
            }
        }
        Ok(())
    }
}

/// Options for one upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    /// Key identifying the revision being uploaded.
    #[serde(default)]
    pub revision_key: String,
    /// Replace content and metadata of an existing revision (default: false).
    #[serde(default)]
    pub allow_overwrite: bool,
    /// Length bound of the recent-revisions list.
    #[serde(default = "default_max_revisions")]
    pub max_revisions: usize,
    /// Alias names to point at the revision, applied in order.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Arbitrary metadata stored next to the revision as JSON.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    /// Directory holding the build output.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    /// File inside `dist_dir` that is uploaded.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// Explicit artifact path; takes precedence over `dist_dir` + `file_pattern`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_max_revisions() -> usize {
    crate::DEFAULT_MAX_REVISIONS
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("tmp/deploy-dist")
}

fn default_file_pattern() -> String {
    "index.html".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            revision_key: String::new(),
            allow_overwrite: false,
            max_revisions: default_max_revisions(),
            aliases: Vec::new(),
            metadata: BTreeMap::new(),
            dist_dir: default_dist_dir(),
            file_pattern: default_file_pattern(),
            file_path: None,
        }
    }
}

impl UploadConfig {
    /// Upload configuration for a revision key with every other field defaulted.
    pub fn for_revision(revision_key: impl Into<String>) -> Self {
        Self {
            revision_key: revision_key.into(),
            ..Self::default()
        }
    }

    /// Path of the artifact to upload.
    pub fn artifact_path(&self) -> PathBuf {
        match &self.file_path {
            Some(path) => path.clone(),
            None => self.dist_dir.join(&self.file_pattern),
        }
    }

    /// Validate the revision key, alias names and retention bound.
    pub fn validate(&self) -> Result<()> {
        validate_revision_key(&self.revision_key)?;
        for alias in &self.aliases {
            validate_alias_name(alias)?;
        }
        if self.max_revisions == 0 {
            return Err(Error::Config("max_revisions must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Options for one activation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivationConfig {
    /// Key of the revision to mark active.
    #[serde(default)]
    pub revision_key: Option<String>,
}

impl ActivationConfig {
    /// Activation configuration for a revision key.
    pub fn for_revision(revision_key: impl Into<String>) -> Self {
        Self {
            revision_key: Some(revision_key.into()),
        }
    }

    /// The requested key, treating an empty string as missing.
    pub fn requested_key(&self) -> Option<&str> {
        self.revision_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// KV store backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Registry key layout.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Upload options.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Activation options.
    #[serde(default)]
    pub activation: ActivationConfig,
}

impl AppConfig {
    /// Create a test configuration backed by the in-memory store.
    ///
    /// **For testing only.**
    pub fn for_testing(namespace: &str) -> Self {
        Self {
            store: StoreConfig::Memory,
            registry: RegistryConfig::for_namespace(namespace),
            upload: UploadConfig::default(),
            activation: ActivationConfig::default(),
        }
    }
}
