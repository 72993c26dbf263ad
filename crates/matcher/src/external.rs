//! Boundary to external match sources.
//!
//! A [`MatchSource`] proposes matches on its own (a generative model, a
//! remote service). Its output is untrusted: [`sanitize_external`] clamps
//! every field, re-anchors spans on the actual documents and converts them
//! into the offset space of the comparison, dropping what cannot be
//! verified.

use async_trait::async_trait;
use canonical::{CanonicalizeConfig, CanonicalizedDocument};
use ngram::TokenFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::KindBands;
use crate::types::{Document, Match, MatchKind, MatchOrigin, OffsetSpace};

/// Wire schema shared with external sources.
///
/// Every field is optional on the wire; numbers are read as floats so a
/// negative or fractional index is clamped instead of failing the entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMatch {
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub matched_text: String,
    /// Percentage; clamped to `[0, 100]`.
    #[serde(default)]
    pub similarity: f64,
    /// Char offset where the span starts in `source_document`.
    #[serde(default)]
    pub start_index: f64,
    #[serde(default)]
    pub end_index: f64,
    #[serde(default)]
    pub source_document: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Failures of an external match source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("invalid source config: {0}")]
    InvalidConfig(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("source returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed source response: {0}")]
    MalformedResponse(String),
}

impl SourceError {
    /// Worth another attempt under a retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Transport(_) => true,
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::InvalidConfig(_) | SourceError::MalformedResponse(_) => false,
        }
    }
}

/// An independent producer of candidate matches.
///
/// Called at most once per analysis, with a timeout; any error degrades
/// the analysis to local matches only.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    async fn propose_matches(&self, documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError>;
}

/// One side of a comparison as the sanitizer sees it.
#[derive(Debug, Clone, Copy)]
pub struct PairSide<'a> {
    pub doc: &'a CanonicalizedDocument,
    /// Post-filter token positions; `Some` when the comparison runs in
    /// token space.
    pub kept: Option<&'a TokenFilter>,
}

/// Validate external entries for the pair `(a, b)`.
///
/// An entry belongs to the pair when its `sourceDocument` names `a` or
/// `b`; entries naming neither apply to the primary pair only. The index
/// range is read in the named document (document B when unnamed) and the
/// counterpart text is located in the other one.
pub fn sanitize_external(
    entries: &[ExternalMatch],
    a: PairSide<'_>,
    b: PairSide<'_>,
    primary: bool,
    bands: &KindBands,
) -> Vec<Match> {
    let out: Vec<Match> = entries
        .iter()
        .filter_map(|entry| sanitize_one(entry, a, b, primary, bands))
        .collect();
    if out.len() < entries.len() {
        debug!(
            received = entries.len(),
            kept = out.len(),
            pair = %format!("{} / {}", a.doc.doc_id, b.doc.doc_id),
            "dropped external matches that failed validation or belong to another pair"
        );
    }
    out
}

fn sanitize_one(
    entry: &ExternalMatch,
    a: PairSide<'_>,
    b: PairSide<'_>,
    primary: bool,
    bands: &KindBands,
) -> Option<Match> {
    if !entry.similarity.is_finite() {
        return None;
    }
    let similarity = entry.similarity.clamp(0.0, 100.0) as f32;

    let named = entry.source_document.as_deref().map(str::trim).unwrap_or("");
    let anchored_in_a = named == a.doc.doc_id;
    if !anchored_in_a && named != b.doc.doc_id && !primary {
        return None;
    }

    let (span_a, span_b) = if anchored_in_a {
        let span_a = clamp_span(entry.start_index, entry.end_index, a.doc.source_chars())?;
        (span_a, locate(b.doc, &entry.matched_text)?)
    } else {
        let span_b = clamp_span(entry.start_index, entry.end_index, b.doc.source_chars())?;
        (locate(a.doc, &entry.original_text)?, span_b)
    };

    let original_text = a.doc.slice_chars(span_a.0, span_a.1);
    let matched_text = b.doc.slice_chars(span_b.0, span_b.1);
    if canonical::normalize(&original_text).is_empty() || canonical::normalize(&matched_text).is_empty() {
        return None;
    }

    let (offsets, (start_a, end_a), (start_b, end_b)) = match (a.kept, b.kept) {
        (Some(kept_a), Some(kept_b)) => (
            OffsetSpace::Tokens,
            to_token_span(a.doc, kept_a, span_a)?,
            to_token_span(b.doc, kept_b, span_b)?,
        ),
        _ => (OffsetSpace::Chars, span_a, span_b),
    };

    let kind = entry
        .kind
        .as_deref()
        .and_then(MatchKind::parse)
        .or_else(|| bands.classify(similarity));

    Some(Match {
        original_text,
        matched_text,
        similarity,
        start_a,
        end_a,
        start_b,
        end_b,
        offsets,
        source_document: b.doc.doc_id.clone(),
        kind,
        color: None,
        origin: MatchOrigin::External,
    })
}

/// Clamp a float index range into `[0, len]`; empty or inverted is `None`.
fn clamp_span(start: f64, end: f64, len: usize) -> Option<(usize, usize)> {
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    let clamp = |v: f64| (v.max(0.0).floor() as usize).min(len);
    let (start, end) = (clamp(start), clamp(end));
    (start < end).then_some((start, end))
}

/// First occurrence of `needle` in `doc`, compared token by token after
/// normalizing both sides the same way. Returns a raw char span.
pub fn locate(doc: &CanonicalizedDocument, needle: &str) -> Option<(usize, usize)> {
    let needle_tokens = tokens_of(needle, &doc.config);
    if needle_tokens.is_empty() || needle_tokens.len() > doc.tokens.len() {
        return None;
    }
    doc.tokens
        .windows(needle_tokens.len())
        .find(|window| window.iter().zip(&needle_tokens).all(|(t, n)| t.text == *n))
        .map(|window| (window[0].start, window[window.len() - 1].end))
}

fn tokens_of(text: &str, cfg: &CanonicalizeConfig) -> Vec<String> {
    canonical::canonicalize("needle", text, cfg)
        .map(|doc| doc.tokens.into_iter().map(|t| t.text).collect())
        .unwrap_or_default()
}

/// Post-filter token range covering a raw char span.
fn to_token_span(doc: &CanonicalizedDocument, kept: &TokenFilter, (start, end): (usize, usize)) -> Option<(usize, usize)> {
    let first = kept.kept.iter().position(|&p| doc.tokens[p].end > start)?;
    let last = kept.kept.iter().rposition(|&p| doc.tokens[p].start < end)?;
    (first <= last).then_some((first, last + 1))
}
