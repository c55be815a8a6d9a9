use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::domain::repositories::realtime_tree::RealtimeTree;

/// REST client for a Firebase-style realtime database.
///
/// Every path maps to `{base}/{path}.json`, with `?auth=` appended when a
/// token is configured.
pub struct RealtimeDbClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl RealtimeDbClient {
    /// `timeout` bounds each request, so a stalled read fails instead of hanging.
    pub fn new(mut base_url: Url, auth_token: Option<String>, timeout: Duration) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build the realtime db http client")?;

        Ok(Self {
            http,
            base_url,
            auth_token: auth_token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("{}.json", path.trim_matches('/')))
            .with_context(|| format!("invalid tree path `{path}`"))?;

        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }

        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "realtime db: request");
        Ok(self.http.request(method, url))
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        // The service wraps rule violations and bad requests as `{"error": "..."}`.
        let service_error = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string));

        error!(
            status = %status,
            service_error = ?service_error,
            response_body = %body,
            context = %context,
            "realtime db request failed"
        );

        anyhow::bail!(
            "Realtime database request failed: {} (status {}, error={:?})",
            context,
            status,
            service_error
        );
    }
}

#[async_trait]
impl RealtimeTree for RealtimeDbClient {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        let resp = self.request(Method::GET, path)?.send().await?;
        let resp = Self::ensure_success(resp, "read").await?;

        let value: Value = resp.json().await.context("read returned invalid JSON")?;
        Ok((!value.is_null()).then_some(value))
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        let resp = self.request(Method::PUT, path)?.json(&value).send().await?;
        Self::ensure_success(resp, "set").await?;
        Ok(())
    }

    async fn merge(&self, path: &str, fields: Value) -> Result<()> {
        let resp = self
            .request(Method::PATCH, path)?
            .json(&fields)
            .send()
            .await?;
        Self::ensure_success(resp, "merge").await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::DELETE, path)?.send().await?;
        Self::ensure_success(resp, "remove").await?;
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String> {
        let resp = self.request(Method::POST, path)?.json(&value).send().await?;
        let resp = Self::ensure_success(resp, "push").await?;

        let parsed: PushResponse = resp.json().await.context("push returned no key")?;
        Ok(parsed.name)
    }
}
