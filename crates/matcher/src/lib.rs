//! # Plagio Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` compares documents pairwise and explains the overlap it finds.
//! It sits on top of the normalizer (`canonical`) and the n-gram extractor
//! (`ngram`) and owns every step after tokenization:
//!
//! 1. **Approximate matching** ([`approx`]): every n-gram of document A is
//!    compared with every n-gram of document B using normalized
//!    Levenshtein similarity; pairs at or above the threshold become
//!    candidates. A sentence strategy compares whole sentences instead.
//! 2. **External merge** ([`external`]): matches proposed by an optional
//!    [`MatchSource`] are clamped, re-anchored on the documents and merged
//!    with the local candidates.
//! 3. **Reduction** ([`reduce`]): candidates that describe the same region
//!    collapse to the strongest one; the reported list is capped and
//!    ordered by position in document A.
//! 4. **Scoring** ([`aggregate`]): `0.7 * coverage + 0.3 * jaccard`,
//!    clamped to `[0, 100]`, and `0` when nothing matched.
//!
//! [`Detector`] runs the whole flow for a batch of documents, under a
//! [`BatchPolicy`], with cancellation and an upper bound on the external
//! source.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Detector, DetectorConfig, Document};
//!
//! let detector = Detector::new(DetectorConfig::default()).expect("valid config");
//! let result = detector
//!     .analyze_local(&[
//!         Document::new("a.txt", "El gato corre rápido por el jardín verde todos los días."),
//!         Document::new("b.txt", "Cada mañana, el perro corre rápido por el jardín verde todos los días."),
//!     ])
//!     .expect("analysis");
//!
//! assert!(result.similarity > 0);
//! assert_eq!(result.matches.len(), 1);
//! ```
//!
//! ## Observability
//!
//! Every analysis emits a `tracing` event with its pair count, match count,
//! score and latency. Attach a [`DetectionMetrics`] implementation with
//! [`Detector::with_metrics`] to forward the same figures to a metrics
//! backend.

pub mod aggregate;
pub mod approx;
pub mod config;
pub mod engine;
pub mod external;
pub mod metrics;
pub mod reduce;
pub mod types;

pub use tokio_util::sync::CancellationToken;

pub use crate::aggregate::{aggregate, score_tokens};
pub use crate::approx::{match_units, string_similarity, Candidate, SentenceUnit, Unit};
pub use crate::config::{
    BatchPolicy, DetectorConfig, KindBands, MatchStrategy, MatcherConfig, ReduceConfig, ScoreConfig,
};
pub use crate::engine::Detector;
pub use crate::external::{sanitize_external, ExternalMatch, MatchSource, PairSide, SourceError};
pub use crate::metrics::DetectionMetrics;
pub use crate::reduce::reduce;
pub use crate::types::{
    AnalysisStatus, DetectError, Document, Match, MatchError, MatchKind, MatchOrigin, OffsetSpace,
    PairResult, PlagiarismResult,
};
