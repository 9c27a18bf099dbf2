//! Client configuration.
//!
//! [`ClientConfig`] carries everything the transport and client need:
//! endpoint, optional default model, optional bearer token, the read
//! timeout, and the request/response body logging toggles. Values are
//! read-only once the client is constructed.

use std::time::Duration;

/// Configuration for an [`InferenceClient`](crate::client::InferenceClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inference endpoint.
    pub base_url: String,
    /// Model substituted into requests that name none.
    pub default_model: Option<String>,
    /// Bearer token sent as `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
    /// Per-request read timeout.
    pub read_timeout: Duration,
    /// Log request bodies at debug level.
    pub log_requests: bool,
    /// Log response bodies at debug level.
    pub log_responses: bool,
}

impl ClientConfig {
    /// Default endpoint for a locally hosted server.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    /// Default read timeout in milliseconds.
    pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1200;

    /// Create a configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_model: None,
            api_key: None,
            read_timeout: Duration::from_millis(Self::DEFAULT_READ_TIMEOUT_MS),
            log_requests: false,
            log_responses: false,
        }
    }

    /// Set the default model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the per-request read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Toggle request body logging.
    pub fn with_request_logging(mut self, on: bool) -> Self {
        self.log_requests = on;
        self
    }

    /// Toggle response body logging.
    pub fn with_response_logging(mut self, on: bool) -> Self {
        self.log_responses = on;
        self
    }

    /// Read configuration from environment variables.
    ///
    /// Recognized keys, for a prefix of `OLLAMA`:
    ///
    /// - `OLLAMA_BASE_URL` — endpoint (default `http://localhost:11434`)
    /// - `OLLAMA_MODEL` — default model
    /// - `OLLAMA_API_KEY` — bearer token
    /// - `OLLAMA_READ_TIMEOUT_MS` — read timeout (default 1200)
    /// - `OLLAMA_REQUEST_LOGGING` / `OLLAMA_RESPONSE_LOGGING` — body
    ///   logging toggles (`true`/`false`, default off)
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env(prefix: &str) -> Self {
        let var = |suffix: &str| std::env::var(format!("{prefix}_{suffix}")).ok();

        let base_url = var("BASE_URL").unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let read_timeout = var("READ_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(Self::DEFAULT_READ_TIMEOUT_MS));
        let flag = |suffix: &str| {
            var(suffix)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };

        Self {
            base_url,
            default_model: var("MODEL"),
            api_key: var("API_KEY"),
            read_timeout,
            log_requests: flag("REQUEST_LOGGING"),
            log_responses: flag("RESPONSE_LOGGING"),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.read_timeout, Duration::from_millis(1200));
        assert!(config.default_model.is_none());
        assert!(config.api_key.is_none());
        assert!(!config.log_requests);
        assert!(!config.log_responses);
    }

    #[test]
    fn test_fluent_setters() {
        let config = ClientConfig::new("http://remote:8080")
            .with_default_model("llama3.1")
            .with_api_key("secret")
            .with_read_timeout(Duration::from_secs(30))
            .with_request_logging(true)
            .with_response_logging(true);

        assert_eq!(config.base_url, "http://remote:8080");
        assert_eq!(config.default_model.as_deref(), Some("llama3.1"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert!(config.log_requests);
        assert!(config.log_responses);
    }

    #[test]
    fn test_from_env_honors_keys_and_defaults() {
        // Unique prefix so parallel tests cannot interfere.
        std::env::set_var("STRUCTO_CFG_TEST_BASE_URL", "http://envhost:1234");
        std::env::set_var("STRUCTO_CFG_TEST_MODEL", "mistral");
        std::env::set_var("STRUCTO_CFG_TEST_READ_TIMEOUT_MS", "2500");
        std::env::set_var("STRUCTO_CFG_TEST_RESPONSE_LOGGING", "true");

        let config = ClientConfig::from_env("STRUCTO_CFG_TEST");
        assert_eq!(config.base_url, "http://envhost:1234");
        assert_eq!(config.default_model.as_deref(), Some("mistral"));
        assert_eq!(config.read_timeout, Duration::from_millis(2500));
        assert!(config.log_responses);
        // Unset keys keep their defaults.
        assert!(config.api_key.is_none());
        assert!(!config.log_requests);

        std::env::remove_var("STRUCTO_CFG_TEST_BASE_URL");
        std::env::remove_var("STRUCTO_CFG_TEST_MODEL");
        std::env::remove_var("STRUCTO_CFG_TEST_READ_TIMEOUT_MS");
        std::env::remove_var("STRUCTO_CFG_TEST_RESPONSE_LOGGING");
    }

    #[test]
    fn test_from_env_unparseable_timeout_falls_back() {
        std::env::set_var("STRUCTO_CFG_BAD_READ_TIMEOUT_MS", "soon");
        let config = ClientConfig::from_env("STRUCTO_CFG_BAD");
        assert_eq!(config.read_timeout, Duration::from_millis(1200));
        std::env::remove_var("STRUCTO_CFG_BAD_READ_TIMEOUT_MS");
    }
}
