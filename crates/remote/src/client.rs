use std::time::Duration;

use async_trait::async_trait;
use matcher::{Document, ExternalMatch, MatchSource, SourceError};
use serde_json::Value;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::prompt::{build_prompt, request_body};
use crate::response::{candidate_text, decode_matches};

/// Match source backed by a generative model behind a `generateContent`
/// endpoint.
///
/// One request per call, no retries; wrap it in
/// [`Retrying`](crate::Retrying) for that.
#[derive(Debug, Clone)]
pub struct GenerativeMatchSource {
    config: RemoteConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GenerativeMatchSource {
    /// Builds the source, reading the API key from the environment.
    pub fn new(config: RemoteConfig) -> Result<Self, SourceError> {
        config.validate()?;
        let api_key = config.api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: RemoteConfig, api_key: impl Into<String>) -> Result<Self, SourceError> {
        config.validate()?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SourceError::InvalidConfig("api key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn send(&self, body: &Value) -> Result<Value, SourceError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::MalformedResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl MatchSource for GenerativeMatchSource {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn propose_matches(&self, documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError> {
        if documents.len() < 2 {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(documents, self.config.max_document_chars);
        let response = self.send(&request_body(&prompt)).await?;
        let text = candidate_text(&response)?;
        let matches = decode_matches(&text)?;

        debug!(model = %self.config.model, matches = matches.len(), "model proposed matches");
        Ok(matches)
    }
}
