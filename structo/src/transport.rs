//! HTTP transport.
//!
//! A thin wrapper over [`reqwest::Client`] that owns the concerns the
//! rest of the crate delegates: URL joining, JSON and bearer headers,
//! the per-request read timeout, status checking, and optional body
//! logging. No retries and no cancellation primitive live here; drop
//! the future to cancel, and put retry policy in a layer above.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// HTTP transport bound to one endpoint.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    read_timeout: Duration,
    log_requests: bool,
    log_responses: bool,
}

impl Transport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            read_timeout: config.read_timeout,
            log_requests: config.log_requests,
            log_responses: config.log_responses,
        }
    }

    /// POST `body` as JSON to `path`, returning the raw response body.
    ///
    /// # Errors
    ///
    /// [`TransportError::Http`] on a non-success status (the body is
    /// carried verbatim), [`TransportError::Request`] on connection or
    /// timeout failures.
    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, TransportError> {
        if self.log_requests {
            match serde_json::to_string(body) {
                Ok(rendered) => debug!(path, body = %rendered, "request"),
                Err(err) => debug!(path, error = %err, "request body not serializable for logging"),
            }
        }

        let mut request = self
            .http
            .post(self.url(path))
            .header("content-type", "application/json")
            .timeout(self.read_timeout)
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        self.execute(path, request).await
    }

    /// GET `path`, returning the raw response body.
    pub async fn get(&self, path: &str) -> Result<String, TransportError> {
        let mut request = self.http.get(self.url(path)).timeout(self.read_timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        self.execute(path, request).await
    }

    async fn execute(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if self.log_responses {
            debug!(path, status = status.as_u16(), body = %body, "response");
        }
        if !status.is_success() {
            return Err(TransportError::http(status.as_u16(), body));
        }
        Ok(body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
