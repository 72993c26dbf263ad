use canonical::CanonicalError;
use chrono::{DateTime, Utc};
use ngram::NGramError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One input document: a caller-chosen name and its extracted plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Similarity band of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchKind {
    Exact,
    Paraphrase,
    Similar,
}

impl MatchKind {
    /// Parses a band label, English or Spanish, ignoring case and accents.
    pub fn parse(label: &str) -> Option<Self> {
        match canonical::normalize(label).as_str() {
            "exact" | "exacto" => Some(MatchKind::Exact),
            "paraphrase" | "parafrasis" => Some(MatchKind::Paraphrase),
            "similar" => Some(MatchKind::Similar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "EXACT",
            MatchKind::Paraphrase => "PARAPHRASE",
            MatchKind::Similar => "SIMILAR",
        }
    }
}

/// Which coordinate system `start_*`/`end_*` use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSpace {
    /// Indices into the post-filter token sequence of each document.
    #[default]
    Tokens,
    /// Char offsets into the raw document text.
    Chars,
}

/// Where a match came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchOrigin {
    #[default]
    Local,
    External,
}

/// A region of document A that reappears, verbatim or reworded, in
/// document B.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Surface text of the region in document A.
    pub original_text: String,
    /// Surface text of the region in document B.
    pub matched_text: String,
    /// Percentage in `[0, 100]`.
    pub similarity: f32,
    pub start_a: usize,
    pub end_a: usize,
    pub start_b: usize,
    pub end_b: usize,
    pub offsets: OffsetSpace,
    /// Name of the document the matched span was found in.
    pub source_document: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MatchKind>,
    /// Presentation tag; never read by scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub origin: MatchOrigin,
}

impl Match {
    /// Spans non-empty and in order, similarity finite and in range.
    pub fn is_well_formed(&self) -> bool {
        self.start_a < self.end_a
            && self.start_b < self.end_b
            && self.similarity.is_finite()
            && (0.0..=100.0).contains(&self.similarity)
    }
}

/// Terminal state of an analysis or of one pairwise comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Completed,
    Processing,
    Error,
}

/// Outcome of comparing one pair of documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PairResult {
    pub document_a: String,
    pub document_b: String,
    /// Overall score in `[0, 100]`.
    pub similarity: u8,
    /// Deduplicated matches in document-A order.
    pub matches: Vec<Match>,
    pub total_matches: usize,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// A document was cut at the token cap.
    #[serde(default)]
    pub truncated: bool,
}

impl PairResult {
    pub(crate) fn failed(document_a: &str, document_b: &str, reason: String) -> Self {
        Self {
            document_a: document_a.to_string(),
            document_b: document_b.to_string(),
            similarity: 0,
            matches: Vec::new(),
            total_matches: 0,
            status: AnalysisStatus::Error,
            error: Some(reason),
            truncated: false,
        }
    }
}

/// Result of one `analyze` call.
///
/// Top-level `similarity`, `matches` and `status` describe the primary pair
/// (the first two documents); `pairs` holds every comparison performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismResult {
    pub id: String,
    pub document_a: String,
    pub document_b: String,
    pub documents: Vec<String>,
    pub similarity: u8,
    pub matches: Vec<Match>,
    pub total_matches: usize,
    pub date: DateTime<Utc>,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pairs: Vec<PairResult>,
    #[serde(default)]
    pub truncated: bool,
}

/// Errors produced inside one pairwise comparison.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("comparison cancelled")]
    Cancelled,
    #[error("document '{name}' has no comparable text")]
    EmptyDocument { name: String },
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("ngram error: {0}")]
    NGram(#[from] NGramError),
}

/// Errors that abort a whole `analyze` call.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("at least 2 documents are required (got {got})")]
    InsufficientInput { got: usize },
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
    #[error("analysis cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}
