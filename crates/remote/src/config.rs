use serde::{Deserialize, Serialize};

use matcher::SourceError;

use crate::retry::RetryConfig;

/// Connection settings for a `generateContent`-style model endpoint.
///
/// The API key itself is never stored in configuration; it is read from the
/// environment variable named by [`api_key_env`](Self::api_key_env).
///
/// # Example
/// ```
/// use remote::RemoteConfig;
///
/// let cfg = RemoteConfig::default().with_model("gemini-1.5-pro");
/// assert!(cfg.validate().is_ok());
/// assert!(cfg.endpoint().ends_with("/gemini-1.5-pro:generateContent"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the models collection.
    pub api_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Timeout for a single HTTP request.
    pub request_timeout_ms: u64,
    /// Each document is cut to this many characters in the prompt.
    pub max_document_chars: usize,
    pub retry: RetryConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            model: "gemini-1.5-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            request_timeout_ms: 15_000,
            max_document_chars: 10_000,
            retry: RetryConfig::default(),
        }
    }
}

impl RemoteConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn validate(&self) -> Result<(), SourceError> {
        let invalid = |msg: &str| Err(SourceError::InvalidConfig(msg.into()));
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return invalid("api_url must be an http(s) URL");
        }
        if self.model.trim().is_empty() {
            return invalid("model must not be empty");
        }
        if self.api_key_env.trim().is_empty() {
            return invalid("api_key_env must name an environment variable");
        }
        if self.request_timeout_ms == 0 {
            return invalid("request_timeout_ms must be greater than zero");
        }
        if self.max_document_chars == 0 {
            return invalid("max_document_chars must be greater than zero");
        }
        Ok(())
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model.trim()
        )
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, SourceError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(SourceError::InvalidConfig(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))),
        }
    }
}
