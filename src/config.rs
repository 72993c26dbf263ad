//! YAML configuration for the whole plagio pipeline.
//!
//! One file describes the detector (normalization, n-grams, matching,
//! reduction, scoring, batch policy) and, optionally, the remote match
//! source. Every section is optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "tesis 2024"
//!
//! detector:
//!   ngram:
//!     n: 7
//!     max_tokens: 2000
//!   matcher:
//!     threshold: 0.85
//!     use_parallel: true
//!   reduce:
//!     window: 5
//!     max_results: 20
//!   policy: exhaustive
//!   strategy: ngram
//!   external_timeout_ms: 20000
//!
//! remote:
//!   enabled: true
//!   model: "gemini-1.5-flash"
//!   api_key_env: "GEMINI_API_KEY"
//!   retry:
//!     max_retries: 2
//!     base_delay: 250
//! ```

use std::fs;
use std::path::Path;

use matcher::DetectorConfig;
use remote::RemoteConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a pipeline file was rejected.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read pipeline file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Malformed YAML, or a value of the wrong shape (an unknown strategy).
    #[error("invalid pipeline YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Well-formed YAML whose values the detector or remote source refuse.
    #[error("invalid pipeline settings: {0}")]
    Validation(String),

    #[error("pipeline file version {0:?} is not supported (expected \"1.0\")")]
    UnsupportedVersion(String),
}

/// Top-level YAML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagioConfig {
    /// `"1.0"` (or `"1"`).
    pub version: String,

    /// Free-form label, logged when the engine is built.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub remote: RemoteSection,
}

/// Remote match source settings plus the switch that turns it on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(flatten)]
    pub settings: RemoteConfig,
}

impl PlagioConfig {
    /// Reads and validates a pipeline file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PlagioConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !matches!(self.version.as_str(), "1.0" | "1") {
            return Err(ConfigLoadError::UnsupportedVersion(self.version.clone()));
        }

        self.detector
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;

        if self.remote.enabled {
            self.remote
                .settings
                .validate()
                .map_err(|e| ConfigLoadError::Validation(format!("remote: {e}")))?;
        }

        Ok(())
    }

    /// Remote settings when the source is enabled.
    pub fn remote_config(&self) -> Option<&RemoteConfig> {
        self.remote.enabled.then_some(&self.remote.settings)
    }
}

impl Default for PlagioConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            detector: DetectorConfig::default(),
            remote: RemoteSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::{BatchPolicy, MatchStrategy};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_sections_keep_defaults() {
        let yaml = r#"
version: "1.0"
name: "tesis 2024"
detector:
  ngram:
    n: 5
  matcher:
    threshold: 0.9
  policy: exhaustive
  strategy: sentence
"#;

        let config = PlagioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name.as_deref(), Some("tesis 2024"));
        assert_eq!(config.detector.ngram.n, 5);
        assert_eq!(config.detector.ngram.max_tokens, 2000);
        assert_eq!(config.detector.matcher.threshold, 0.9);
        assert_eq!(config.detector.reduce.max_results, 20);
        assert_eq!(config.detector.policy, BatchPolicy::Exhaustive);
        assert_eq!(config.detector.strategy, MatchStrategy::Sentence);
        assert!(config.remote_config().is_none());
    }

    #[test]
    fn loads_from_disk() {
        let yaml = r#"
version: "1"
detector:
  reduce:
    window: 3
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PlagioConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.detector.reduce.window, 3);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = PlagioConfig::from_file("/nonexistent/plagio.yaml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }

    #[test]
    fn default_is_valid() {
        let config = PlagioConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn future_versions_are_rejected() {
        let err = PlagioConfig::from_yaml("version: \"2.0\"").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn detector_values_are_validated() {
        let yaml = r#"
version: "1.0"
detector:
  matcher:
    threshold: 1.5
"#;
        let err = PlagioConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn remote_section_flattens_settings() {
        let yaml = r#"
version: "1.0"
remote:
  enabled: true
  model: "gemini-1.5-pro"
  request_timeout_ms: 5000
  retry:
    max_retries: 2
    base_delay: 250
"#;
        let config = PlagioConfig::from_yaml(yaml).unwrap();
        let remote = config.remote_config().unwrap();
        assert_eq!(remote.model, "gemini-1.5-pro");
        assert_eq!(remote.request_timeout_ms, 5000);
        assert_eq!(remote.max_document_chars, 10_000);
        assert_eq!(remote.retry.max_retries, 2);
        assert_eq!(remote.retry.base_delay, Duration::from_millis(250));
    }

    #[test]
    fn disabled_remote_is_not_validated() {
        let yaml = r#"
version: "1.0"
remote:
  enabled: false
  request_timeout_ms: 0
"#;
        assert!(PlagioConfig::from_yaml(yaml).is_ok());

        let enabled = yaml.replace("enabled: false", "enabled: true");
        assert!(PlagioConfig::from_yaml(&enabled).is_err());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = PlagioConfig::from_yaml("version: [1.0").unwrap_err();
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }
}
