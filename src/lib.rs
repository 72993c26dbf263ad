//! Workspace umbrella crate for plagio, a pairwise document-similarity engine.
//!
//! The stages live in their own crates and are re-exported here:
//! normalization (`canonical`), n-gram extraction (`ngram`), matching,
//! reduction, scoring and orchestration (`matcher`), and the optional
//! generative-model match source (`remote`). [`Engine`] bundles a
//! [`Detector`] with the match source a [`PlagioConfig`] asks for, which is
//! what the CLI and the HTTP server run.
//!
//! ```
//! use plagio::{CancellationToken, Document, Engine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), plagio::PlagioError> {
//! let engine = Engine::with_defaults()?;
//! let docs = [
//!     Document::new("a.txt", "El gato corre rápido por el jardín verde todos los días."),
//!     Document::new("b.txt", "El gato corre rápido por el jardín verde todos los días."),
//! ];
//! let result = engine.analyze(&docs, &CancellationToken::new()).await?;
//! assert_eq!(result.similarity, 100);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod report;

use std::fmt;
use std::sync::Arc;

pub use canonical::{
    canonicalize, normalize, CanonicalError, CanonicalizeConfig, CanonicalizedDocument, Sentence,
    Token,
};
pub use config::{ConfigLoadError, PlagioConfig, RemoteSection};
pub use matcher::{
    aggregate, match_units, reduce, score_tokens, string_similarity, AnalysisStatus,
    BatchPolicy, CancellationToken, Candidate, DetectError, DetectionMetrics, Detector,
    DetectorConfig, Document, ExternalMatch, Match, MatchKind, MatchOrigin, MatchSource,
    MatchStrategy, OffsetSpace, PairResult, PlagiarismResult, ReduceConfig, ScoreConfig,
    SourceError,
};
pub use ngram::{extract_ngrams, NGram, NGramConfig, NGramError};
pub use remote::{GenerativeMatchSource, RemoteConfig, RetryConfig, Retrying};
pub use report::{render_text, render_text_with, RiskLevel};

use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by [`Engine`].
#[derive(Debug, Error)]
pub enum PlagioError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error("match source unavailable: {0}")]
    Source(#[from] SourceError),
}

/// A detector plus the external match source it consults, if any.
#[derive(Clone)]
pub struct Engine {
    detector: Detector,
    source: Option<Arc<dyn MatchSource>>,
}

impl Engine {
    /// Local-only engine.
    pub fn new(detector: Detector) -> Self {
        Self {
            detector,
            source: None,
        }
    }

    /// Local-only engine with the default detector configuration.
    pub fn with_defaults() -> Result<Self, PlagioError> {
        Ok(Self::new(Detector::new(DetectorConfig::default())?))
    }

    pub fn with_source(mut self, source: Arc<dyn MatchSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds the detector and, when `remote.enabled`, the generative match
    /// source wrapped in its retry policy. Fails if the API key is missing.
    pub fn from_config(config: &PlagioConfig) -> Result<Self, PlagioError> {
        config.validate()?;
        let engine = Self::new(Detector::new(config.detector.clone())?);
        debug!(
            name = config.name.as_deref().unwrap_or("default"),
            policy = ?config.detector.policy,
            strategy = ?config.detector.strategy,
            "pipeline configured"
        );

        let Some(remote_cfg) = config.remote_config() else {
            return Ok(engine);
        };
        let retry = remote_cfg.retry.clone();
        let source = Retrying::new(GenerativeMatchSource::new(remote_cfg.clone())?, retry);
        info!(model = %remote_cfg.model, "remote match source enabled");
        Ok(engine.with_source(Arc::new(source)))
    }

    /// Same engine and source with the batch policy or strategy replaced.
    pub fn with_overrides(
        &self,
        policy: Option<BatchPolicy>,
        strategy: Option<MatchStrategy>,
    ) -> Result<Self, PlagioError> {
        if policy.is_none() && strategy.is_none() {
            return Ok(self.clone());
        }
        let mut config = self.detector.config().clone();
        if let Some(policy) = policy {
            config.policy = policy;
        }
        if let Some(strategy) = strategy {
            config.strategy = strategy;
        }
        Ok(Self {
            detector: Detector::new(config)?,
            source: self.source.clone(),
        })
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn source(&self) -> Option<&dyn MatchSource> {
        self.source.as_deref()
    }

    /// Analyzes `documents` with the configured source, if any.
    pub async fn analyze(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<PlagiarismResult, PlagioError> {
        Ok(self
            .detector
            .analyze(documents, self.source(), cancel)
            .await?)
    }

    /// Two-document convenience over [`Engine::analyze`].
    pub async fn compare(
        &self,
        document_a: Document,
        document_b: Document,
        cancel: &CancellationToken,
    ) -> Result<PlagiarismResult, PlagioError> {
        self.analyze(&[document_a, document_b], cancel).await
    }

    /// Text report rendered with this engine's detector settings.
    pub fn report(&self, result: &PlagiarismResult) -> String {
        render_text_with(result, self.detector.config())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("detector", &self.detector)
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Silent;

    #[async_trait]
    impl MatchSource for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        async fn propose_matches(
            &self,
            _documents: &[Document],
        ) -> Result<Vec<ExternalMatch>, SourceError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn default_config_builds_local_engine() {
        let engine = Engine::from_config(&PlagioConfig::default()).unwrap();
        assert!(engine.source().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = PlagioConfig::default();
        cfg.detector.reduce.max_results = 0;
        let err = Engine::from_config(&cfg).unwrap_err();
        assert!(matches!(err, PlagioError::Config(ConfigLoadError::Validation(_))));
    }

    #[test]
    fn remote_without_key_fails() {
        let mut cfg = PlagioConfig::default();
        cfg.remote.enabled = true;
        cfg.remote.settings.api_key_env = "PLAGIO_TEST_KEY_THAT_IS_NEVER_SET".into();
        let err = Engine::from_config(&cfg).unwrap_err();
        assert!(matches!(err, PlagioError::Source(SourceError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn compare_runs_both_documents() {
        let engine = Engine::with_defaults()
            .unwrap()
            .with_source(Arc::new(Silent));
        assert!(format!("{engine:?}").contains("silent"));

        let result = engine
            .compare(
                Document::new("a.txt", "Las ballenas migran miles de kilómetros cada año."),
                Document::new("b.txt", "Los autos eléctricos necesitan baterías de litio."),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(result.similarity, 0);
        assert_eq!(result.document_a, "a.txt");
        assert_eq!(result.document_b, "b.txt");
        assert!(engine.report(&result).contains("BAJO RIESGO"));
    }

    #[test]
    fn overrides_keep_the_source() {
        let engine = Engine::with_defaults()
            .unwrap()
            .with_source(Arc::new(Silent));
        let tuned = engine
            .with_overrides(Some(BatchPolicy::Exhaustive), Some(MatchStrategy::Sentence))
            .unwrap();
        assert_eq!(tuned.detector().config().policy, BatchPolicy::Exhaustive);
        assert_eq!(tuned.detector().config().strategy, MatchStrategy::Sentence);
        assert_eq!(tuned.source().map(|s| s.name()), Some("silent"));
        assert_eq!(engine.detector().config().policy, BatchPolicy::AgainstPrimary);
    }

    #[tokio::test]
    async fn too_few_documents_is_an_error() {
        let engine = Engine::with_defaults().unwrap();
        let err = engine
            .analyze(&[Document::new("solo", "texto")], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlagioError::Detect(DetectError::InsufficientInput { got: 1 })
        ));
    }
}
