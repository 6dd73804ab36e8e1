//! Consul KV backend over the HTTP API (v1).

use crate::error::{StorageError, StorageResult};
use crate::traits::{DeleteOptions, KvStore, check_key};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::instrument;

const TOKEN_HEADER: &str = "X-Consul-Token";

/// Consul KV store client.
pub struct ConsulBackend {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    datacenter: Option<String>,
}

impl std::fmt::Debug for ConsulBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsulBackend")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("datacenter", &self.datacenter)
            .finish()
    }
}

impl ConsulBackend {
    /// Create a client for the agent at `base_url` (e.g. `http://localhost:8500`).
    pub fn new(
        base_url: &str,
        token: Option<String>,
        datacenter: Option<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StorageError::Config(format!("invalid consul URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Config(format!(
                "consul URL cannot be a base: {base_url}"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.is_empty()),
            datacenter: datacenter.filter(|dc| !dc.is_empty()),
        })
    }

    /// Build `/v1/kv/<key>`, percent-encoding each path segment.
    ///
    /// A trailing `/` in `key` is preserved, which Consul treats as a folder.
    fn kv_url(&self, key: &str) -> StorageResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::Config("consul URL cannot be a base".to_string()))?;
            segments.pop_if_empty().extend(["v1", "kv"]);
            segments.extend(key.split('/'));
        }
        if let Some(dc) = &self.datacenter {
            url.query_pairs_mut().append_pair("dc", dc);
        }
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn unexpected(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StorageError::UnexpectedStatus {
            backend: "consul",
            status,
            body,
        }
    }

    /// Consul answers writes and deletes with a literal `true` or `false`.
    async fn expect_true(response: reqwest::Response, key: &str) -> StorageResult<()> {
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        let body = response.text().await?;
        match body.trim() {
            "true" => Ok(()),
            "false" => Err(StorageError::WriteRejected(key.to_string())),
            other => Err(StorageError::InvalidResponse(format!(
                "expected true or false, got {other:?}"
            ))),
        }
    }

    async fn delete_one(&self, key: &str, recurse: bool) -> StorageResult<()> {
        let mut url = self.kv_url(key)?;
        if recurse {
            url.query_pairs_mut().append_key_only("recurse");
        }
        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        Self::expect_true(response, key).await
    }
}

#[async_trait]
impl KvStore for ConsulBackend {
    #[instrument(skip(self), fields(backend = "consul"))]
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        check_key(key)?;
        let mut url = self.kv_url(key)?;
        url.query_pairs_mut().append_key_only("raw");

        let response = self.request(reqwest::Method::GET, url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?)),
            _ => Err(Self::unexpected(response).await),
        }
    }

    #[instrument(skip(self, value), fields(backend = "consul", size = value.len()))]
    async fn set(&self, key: &str, value: Bytes) -> StorageResult<()> {
        check_key(key)?;
        let url = self.kv_url(key)?;
        let response = self
            .request(reqwest::Method::PUT, url)
            .body(value)
            .send()
            .await?;
        Self::expect_true(response, key).await
    }

    #[instrument(skip(self), fields(backend = "consul"))]
    async fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut url = self.kv_url(prefix)?;
        url.query_pairs_mut().append_key_only("keys");

        let response = self.request(reqwest::Method::GET, url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => {
                let body = response.bytes().await?;
                let mut keys: Vec<String> = serde_json::from_slice(&body).map_err(|e| {
                    StorageError::InvalidResponse(format!("key listing is not a string array: {e}"))
                })?;
                keys.sort();
                Ok(keys)
            }
            _ => Err(Self::unexpected(response).await),
        }
    }

    #[instrument(skip(self), fields(backend = "consul"))]
    async fn delete(&self, key: &str, options: DeleteOptions) -> StorageResult<()> {
        check_key(key)?;
        self.delete_one(key, false).await?;
        if options.recursive {
            // Consul's recurse is a plain string prefix match, so scope it to
            // the `key/` folder; `?recurse` on `key` would also hit `key2`.
            self.delete_one(&format!("{key}/"), true).await?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "consul"
    }

    #[instrument(skip(self), fields(backend = "consul"))]
    async fn health_check(&self) -> StorageResult<()> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Config("consul URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "status", "leader"]);

        let response = self.request(reqwest::Method::GET, url).send().await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        let leader = response.text().await?;
        if leader.trim().trim_matches('"').is_empty() {
            return Err(StorageError::InvalidResponse(
                "consul cluster has no leader".to_string(),
            ));
        }
        Ok(())
    }
}
