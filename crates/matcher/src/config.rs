//! Tuning knobs for matching, reduction, scoring and the orchestrator.
//!
//! Every struct is serde-friendly with per-field defaults, so partial
//! configs (YAML, JSON request bodies) fill in the rest.

use canonical::CanonicalizeConfig;
use ngram::NGramConfig;
use serde::{Deserialize, Serialize};

use crate::types::{DetectError, MatchKind};

/// Approximate matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    /// Minimum normalized edit similarity (0, 1] for two n-grams to match.
    #[serde(default = "MatcherConfig::default_threshold")]
    pub threshold: f64,
    /// Threshold for sentence comparison; `1.0` means exact equality.
    #[serde(default = "MatcherConfig::default_sentence_threshold")]
    pub sentence_threshold: f64,
    /// Sentences shorter than this (normalized chars) are not compared.
    #[serde(default = "MatcherConfig::default_min_sentence_chars")]
    pub min_sentence_chars: usize,
    /// Sentences compared per document; later ones are dropped and the
    /// pair is flagged as truncated.
    #[serde(default = "MatcherConfig::default_max_sentences")]
    pub max_sentences: usize,
    /// Split the comparison loop across rayon workers.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatcherConfig {
    pub(crate) fn default_threshold() -> f64 {
        0.85
    }

    pub(crate) fn default_sentence_threshold() -> f64 {
        1.0
    }

    pub(crate) fn default_min_sentence_chars() -> usize {
        15
    }

    pub(crate) fn default_max_sentences() -> usize {
        500
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            sentence_threshold: Self::default_sentence_threshold(),
            min_sentence_chars: Self::default_min_sentence_chars(),
            max_sentences: Self::default_max_sentences(),
            use_parallel: false,
        }
    }
}

/// Match reducer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Two matches whose A starts, or whose B starts, are closer than this
    /// refer to the same region.
    #[serde(default = "ReduceConfig::default_window")]
    pub window: usize,
    /// Matches reported per comparison.
    #[serde(default = "ReduceConfig::default_max_results")]
    pub max_results: usize,
}

impl ReduceConfig {
    pub(crate) fn default_window() -> usize {
        5
    }

    pub(crate) fn default_max_results() -> usize {
        20
    }
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            window: Self::default_window(),
            max_results: Self::default_max_results(),
        }
    }
}

/// Lower bounds (percent) of the similarity bands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KindBands {
    pub exact: f32,
    pub paraphrase: f32,
    pub similar: f32,
}

impl KindBands {
    /// Band for a similarity percentage; `None` below `similar`.
    pub fn classify(&self, similarity: f32) -> Option<MatchKind> {
        if similarity >= self.exact {
            Some(MatchKind::Exact)
        } else if similarity >= self.paraphrase {
            Some(MatchKind::Paraphrase)
        } else if similarity >= self.similar {
            Some(MatchKind::Similar)
        } else {
            None
        }
    }
}

impl Default for KindBands {
    fn default() -> Self {
        Self {
            exact: 90.0,
            paraphrase: 70.0,
            similar: 40.0,
        }
    }
}

/// Aggregate score settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreConfig {
    #[serde(default = "ScoreConfig::default_coverage_weight")]
    pub coverage_weight: f64,
    #[serde(default = "ScoreConfig::default_jaccard_weight")]
    pub jaccard_weight: f64,
    /// Tokens shorter than this are left out of the vocabulary sets.
    #[serde(default = "ScoreConfig::default_jaccard_min_token_chars")]
    pub jaccard_min_token_chars: usize,
    #[serde(default)]
    pub bands: KindBands,
}

impl ScoreConfig {
    pub(crate) fn default_coverage_weight() -> f64 {
        0.7
    }

    pub(crate) fn default_jaccard_weight() -> f64 {
        0.3
    }

    pub(crate) fn default_jaccard_min_token_chars() -> usize {
        3
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            coverage_weight: Self::default_coverage_weight(),
            jaccard_weight: Self::default_jaccard_weight(),
            jaccard_min_token_chars: Self::default_jaccard_min_token_chars(),
            bands: KindBands::default(),
        }
    }
}

/// Which document pairs a multi-document analysis compares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Every document against the first one.
    #[default]
    AgainstPrimary,
    /// Every unordered pair.
    Exhaustive,
}

/// Unit of local comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Word n-grams, approximate; offsets are token indices.
    #[default]
    NGram,
    /// Whole sentences; offsets are char positions.
    Sentence,
}

/// Full configuration of a [`Detector`](crate::Detector).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub canonical: CanonicalizeConfig,
    pub ngram: NGramConfig,
    pub matcher: MatcherConfig,
    pub reduce: ReduceConfig,
    pub score: ScoreConfig,
    pub policy: BatchPolicy,
    pub strategy: MatchStrategy,
    /// Upper bound on the external match source call, in milliseconds.
    pub external_timeout_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canonical: CanonicalizeConfig::default(),
            ngram: NGramConfig::default(),
            matcher: MatcherConfig::default(),
            reduce: ReduceConfig::default(),
            score: ScoreConfig::default(),
            policy: BatchPolicy::default(),
            strategy: MatchStrategy::default(),
            external_timeout_ms: Self::default_external_timeout_ms(),
        }
    }
}

impl DetectorConfig {
    pub(crate) fn default_external_timeout_ms() -> u64 {
        20_000
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.matcher.threshold = threshold;
        self
    }

    pub fn with_ngram(mut self, ngram: NGramConfig) -> Self {
        self.ngram = ngram;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.matcher.use_parallel = use_parallel;
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.matcher.max_sentences = max_sentences;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.reduce.max_results = max_results;
        self
    }

    pub fn with_external_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.external_timeout_ms = timeout_ms;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), DetectError> {
        let invalid = |msg: String| Err(DetectError::InvalidConfig(msg));

        if self.canonical.version == 0 {
            return invalid("canonical.version must be >= 1".into());
        }
        if let Err(err) = self.ngram.validate() {
            return invalid(err.to_string());
        }
        for (name, value) in [
            ("matcher.threshold", self.matcher.threshold),
            ("matcher.sentence_threshold", self.matcher.sentence_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return invalid(format!("{name} must be in (0, 1] (got {value})"));
            }
        }
        if self.matcher.max_sentences == 0 {
            return invalid("matcher.max_sentences must be greater than zero".into());
        }
        if self.reduce.window == 0 {
            return invalid("reduce.window must be greater than zero".into());
        }
        if self.reduce.max_results == 0 {
            return invalid("reduce.max_results must be greater than zero".into());
        }
        for (name, value) in [
            ("score.coverage_weight", self.score.coverage_weight),
            ("score.jaccard_weight", self.score.jaccard_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a finite value >= 0 (got {value})"));
            }
        }
        let bands = &self.score.bands;
        let ordered = bands.exact <= 100.0
            && bands.exact >= bands.paraphrase
            && bands.paraphrase >= bands.similar
            && bands.similar >= 0.0;
        if !ordered {
            return invalid(
                "score.bands must satisfy 100 >= exact >= paraphrase >= similar >= 0".into(),
            );
        }
        if self.external_timeout_ms == 0 {
            return invalid("external_timeout_ms must be greater than zero".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = DetectorConfig::new();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.matcher.threshold, 0.85);
        assert_eq!(cfg.reduce.window, 5);
        assert_eq!(cfg.reduce.max_results, 20);
        assert_eq!(cfg.score.coverage_weight, 0.7);
        assert_eq!(cfg.score.jaccard_weight, 0.3);
        assert_eq!(cfg.policy, BatchPolicy::AgainstPrimary);
        assert_eq!(cfg.strategy, MatchStrategy::NGram);
        assert_eq!(cfg.external_timeout_ms, 20_000);
    }

    #[test]
    fn zero_sized_limits_rejected() {
        let mut no_window = DetectorConfig::new();
        no_window.reduce.window = 0;
        let no_sentences = DetectorConfig::new().with_max_sentences(0);

        for (cfg, field) in [(no_window, "reduce.window"), (no_sentences, "matcher.max_sentences")] {
            match cfg.validate() {
                Err(DetectError::InvalidConfig(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected InvalidConfig for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn serde_default_matches_new() {
        let cfg: DetectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, DetectorConfig::new());
    }

    #[test]
    fn invalid_threshold_rejected() {
        for threshold in [0.0, -0.1, 1.5, f64::NAN] {
            let cfg = DetectorConfig::new().with_threshold(threshold);
            let err = cfg.validate().expect_err("config should be invalid");
            match err {
                DetectError::InvalidConfig(msg) => assert!(msg.contains("matcher.threshold")),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn invalid_max_results_rejected() {
        let cfg = DetectorConfig::new().with_max_results(0);
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidConfig(msg)) if msg.contains("max_results")));
    }

    #[test]
    fn unordered_bands_rejected() {
        let mut cfg = DetectorConfig::new();
        cfg.score.bands.paraphrase = 95.0;
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidConfig(msg)) if msg.contains("bands")));
    }

    #[test]
    fn classify_uses_lower_bounds() {
        let bands = KindBands::default();
        assert_eq!(bands.classify(100.0), Some(MatchKind::Exact));
        assert_eq!(bands.classify(90.0), Some(MatchKind::Exact));
        assert_eq!(bands.classify(89.9), Some(MatchKind::Paraphrase));
        assert_eq!(bands.classify(70.0), Some(MatchKind::Paraphrase));
        assert_eq!(bands.classify(40.0), Some(MatchKind::Similar));
        assert_eq!(bands.classify(39.0), None);
    }

    #[test]
    fn policy_and_strategy_names() {
        assert_eq!(serde_json::to_string(&BatchPolicy::Exhaustive).unwrap(), "\"exhaustive\"");
        assert_eq!(
            serde_json::to_string(&BatchPolicy::AgainstPrimary).unwrap(),
            "\"against_primary\""
        );
        assert_eq!(serde_json::to_string(&MatchStrategy::NGram).unwrap(), "\"ngram\"");
        let s: MatchStrategy = serde_json::from_str("\"sentence\"").unwrap();
        assert_eq!(s, MatchStrategy::Sentence);
    }
}
