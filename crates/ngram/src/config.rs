//! Configuration and error types for n-gram extraction.
//!
//! Extraction is a pure function of `(normalized_tokens, config)`; nothing
//! here touches I/O or process state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for word n-gram extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NGramConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Number of tokens per n-gram.
    ///
    /// Larger values only fire on longer shared passages; smaller ones are
    /// noisier on common phrases.
    pub n: usize,
    /// Tokens with fewer characters than this are dropped before windowing.
    /// `0` or `1` keeps every token.
    pub min_token_chars: usize,
    /// Windows whose joined text (single spaces included) has fewer
    /// characters than this are skipped.
    pub min_ngram_chars: usize,
    /// Maximum number of post-filter tokens read from one document.
    ///
    /// Bounds the quadratic comparison; tokens past the cap are ignored and
    /// the filter reports truncation.
    pub max_tokens: usize,
}

impl NGramConfig {
    /// Create a new configuration with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size in tokens. Typical values: 4-9.
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_min_token_chars(mut self, min_token_chars: usize) -> Self {
        self.min_token_chars = min_token_chars;
        self
    }

    pub fn with_min_ngram_chars(mut self, min_ngram_chars: usize) -> Self {
        self.min_ngram_chars = min_ngram_chars;
        self
    }

    /// Set the per-document token cap.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), NGramError> {
        if self.version < 1 {
            return Err(NGramError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.n < 1 {
            return Err(NGramError::InvalidN { n: self.n });
        }
        if self.max_tokens < self.n {
            return Err(NGramError::InvalidMaxTokens {
                max_tokens: self.max_tokens,
                n: self.n,
            });
        }
        Ok(())
    }
}

impl Default for NGramConfig {
    fn default() -> Self {
        Self {
            version: 1,
            n: 7,
            min_token_chars: 3,
            min_ngram_chars: 26,
            max_tokens: 2000,
        }
    }
}

/// Errors returned by n-gram extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NGramError {
    #[error("invalid config: n must be >= 1 (got {n})")]
    InvalidN { n: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: max_tokens ({max_tokens}) must be >= n ({n})")]
    InvalidMaxTokens { max_tokens: usize, n: usize },
}
