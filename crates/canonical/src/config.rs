//! Configuration types for the normalization layer.
//!
//! [`CanonicalizeConfig`] controls how raw document text is folded into the
//! comparable form used by every later stage.
//!
//! # Versioning
//!
//! Any change to normalization output (even a bug fix) must come with a
//! version bump so scores produced by different builds can be told apart.
//!
//! # Examples
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.strip_accents);
//! assert!(config.lowercase);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the normalization pipeline.
///
/// Cheap to clone and serializable, so it can live inside larger pipeline
/// configs (YAML or JSON):
///
/// ```json
/// {
///   "version": 1,
///   "strip_accents": true,
///   "lowercase": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanonicalizeConfig {
    /// Version of the normalization behavior.
    ///
    /// Must be >= 1. Version 0 is reserved and rejected with
    /// [`CanonicalError::InvalidConfig`](crate::CanonicalError::InvalidConfig).
    pub version: u32,

    /// If true, decompose to NFD and drop combining marks, so `á` compares
    /// equal to `a` and `ñ` to `n`.
    ///
    /// # Default
    ///
    /// `true`
    pub strip_accents: bool,

    /// If true, apply locale-free Unicode lowercasing.
    ///
    /// Lowercasing can expand one character into several (`İ` becomes
    /// `i` plus a combining dot, which accent stripping then removes).
    ///
    /// # Default
    ///
    /// `true`
    pub lowercase: bool,
}

impl CanonicalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_accents(mut self, strip_accents: bool) -> Self {
        self.strip_accents = strip_accents;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strip_accents: true,
            lowercase: true,
        }
    }
}
