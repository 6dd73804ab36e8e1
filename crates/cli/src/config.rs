//! Configuration loading for the CLI.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use kvdeploy_core::config::AppConfig;
use serde_json::Value;
use std::path::Path;

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `KVDEPLOY_REGISTRY__NAMESPACE=my-app`.
pub const ENV_PREFIX: &str = "KVDEPLOY_";

/// Load configuration from an optional TOML file overlaid with environment
/// variables. A missing file is not an error.
pub fn load(path: &Path) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if path.exists() {
        tracing::debug!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path.display());
    }

    let config: AppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .store
        .validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid store configuration")?;
    Ok(config)
}

/// Parse a `key=value` metadata pair. Values that parse as JSON keep their
/// type; anything else is stored as a string.
pub fn parse_metadata(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("metadata key is empty in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
