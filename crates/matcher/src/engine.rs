use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use canonical::{canonicalize, split_sentences, CanonicalizedDocument};
use chrono::Utc;
use ngram::{extract_document, NGram, TokenFilter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::score_tokens;
use crate::approx::{match_units, Candidate, SentenceUnit};
use crate::config::{BatchPolicy, DetectorConfig, MatchStrategy, MatcherConfig};
use crate::external::{sanitize_external, ExternalMatch, MatchSource, PairSide};
use crate::metrics::DetectionMetrics;
use crate::reduce;
use crate::types::{
    AnalysisStatus, DetectError, Document, Match, MatchError, MatchOrigin, OffsetSpace, PairResult,
    PlagiarismResult,
};


/// Highlight colors handed out to reported matches in document order.
const MATCH_COLORS: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#AED6F1", "#D7BDE2",
];

/// Pairwise document comparison.
///
/// Holds configuration only, so it is cheap to clone and safe to share
/// across threads; every call is independent.
#[derive(Clone)]
pub struct Detector {
    config: Arc<DetectorConfig>,
    metrics: Option<Arc<dyn DetectionMetrics>>,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Detector {
    /// Build a detector from a validated configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            metrics: None,
        })
    }

    /// Report every analysis to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn DetectionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Analyze `documents` with an optional external source.
    ///
    /// The source is awaited once, bounded by `external_timeout_ms`; its
    /// failure only costs the external matches. The local engine then runs
    /// on the blocking pool. Cancelling `cancel` at any point yields
    /// [`DetectError::Cancelled`] and no result.
    pub async fn analyze(
        &self,
        documents: &[Document],
        source: Option<&dyn MatchSource>,
        cancel: &CancellationToken,
    ) -> Result<PlagiarismResult, DetectError> {
        check_input(documents)?;

        let external = match source {
            Some(source) => self.fetch_external(source, documents, cancel).await?,
            None => Vec::new(),
        };

        let detector = self.clone();
        let documents = documents.to_vec();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || detector.analyze_blocking(&documents, &external, &cancel))
            .await
            .map_err(|err| DetectError::Internal(format!("analysis task failed: {err}")))?
    }

    /// Analyze `documents` with local matching only, on the calling thread.
    pub fn analyze_local(&self, documents: &[Document]) -> Result<PlagiarismResult, DetectError> {
        self.analyze_blocking(documents, &[], &CancellationToken::new())
    }

    /// Synchronous core: every pair selected by the batch policy, with
    /// already-fetched external matches merged in.
    pub fn analyze_blocking(
        &self,
        documents: &[Document],
        external: &[ExternalMatch],
        cancel: &CancellationToken,
    ) -> Result<PlagiarismResult, DetectError> {
        check_input(documents)?;
        let started = Instant::now();

        let pairs = pair_indices(documents.len(), self.config.policy);
        let mut results = Vec::with_capacity(pairs.len());
        for (rank, (i, j)) in pairs.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(DetectError::Cancelled);
            }
            let pair = self.compare_pair(&documents[i], &documents[j], external, rank == 0, cancel)?;
            results.push(pair);
        }

        let primary = results
            .first()
            .cloned()
            .ok_or_else(|| DetectError::Internal("no document pair was compared".into()))?;
        let latency = started.elapsed();

        info!(
            documents = documents.len(),
            pairs = results.len(),
            matches = primary.total_matches,
            similarity = primary.similarity,
            status = ?primary.status,
            latency_ms = latency.as_millis() as u64,
            "analysis completed"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_analysis(results.len(), primary.total_matches, primary.status, latency);
        }

        Ok(PlagiarismResult {
            id: Uuid::new_v4().to_string(),
            document_a: primary.document_a,
            document_b: primary.document_b,
            documents: documents.iter().map(|d| d.name.clone()).collect(),
            similarity: primary.similarity,
            matches: primary.matches,
            total_matches: primary.total_matches,
            date: Utc::now(),
            status: primary.status,
            error: primary.error,
            truncated: results.iter().any(|p| p.truncated),
            pairs: results,
        })
    }

    /// Compare one pair. Failures local to the pair come back as a
    /// `PairResult` with status `error`; only cancellation is an `Err`.
    pub fn compare_pair(
        &self,
        a: &Document,
        b: &Document,
        external: &[ExternalMatch],
        primary: bool,
        cancel: &CancellationToken,
    ) -> Result<PairResult, DetectError> {
        match self.run_pair(a, b, external, primary, cancel) {
            Ok(pair) => Ok(pair),
            Err(MatchError::Cancelled) => Err(DetectError::Cancelled),
            Err(err) => {
                warn!(
                    document_a = %a.name,
                    document_b = %b.name,
                    error = %err,
                    "pairwise comparison failed"
                );
                Ok(PairResult::failed(&a.name, &b.name, err.to_string()))
            }
        }
    }

    async fn fetch_external(
        &self,
        source: &dyn MatchSource,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<Vec<ExternalMatch>, DetectError> {
        let timeout_ms = self.config.external_timeout_ms;
        let call = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            source.propose_matches(documents),
        );

        tokio::select! {
            _ = cancel.cancelled() => Err(DetectError::Cancelled),
            outcome = call => match outcome {
                Ok(Ok(entries)) => {
                    debug!(source = source.name(), entries = entries.len(), "external matches received");
                    Ok(entries)
                }
                Ok(Err(err)) => {
                    warn!(source = source.name(), error = %err, "external match source failed; using local matches only");
                    self.note_external_failure(source.name());
                    Ok(Vec::new())
                }
                Err(_) => {
                    warn!(source = source.name(), timeout_ms, "external match source timed out; using local matches only");
                    self.note_external_failure(source.name());
                    Ok(Vec::new())
                }
            },
        }
    }

    fn note_external_failure(&self, source: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_external_failure(source);
        }
    }

    fn run_pair(
        &self,
        a: &Document,
        b: &Document,
        external: &[ExternalMatch],
        primary: bool,
        cancel: &CancellationToken,
    ) -> Result<PairResult, MatchError> {
        let cfg = &*self.config;
        let doc_a = canonicalize(a.name.as_str(), &a.content, &cfg.canonical)?;
        let doc_b = canonicalize(b.name.as_str(), &b.content, &cfg.canonical)?;
        for doc in [&doc_a, &doc_b] {
            if doc.is_empty() {
                return Err(MatchError::EmptyDocument {
                    name: doc.doc_id.clone(),
                });
            }
        }

        let mut sentences_truncated = false;
        let (local, filters) = match cfg.strategy {
            MatchStrategy::NGram => {
                let grams_a = extract_document(&doc_a, &cfg.ngram)?;
                let grams_b = extract_document(&doc_b, &cfg.ngram)?;
                let filters = (grams_a.token_filter().clone(), grams_b.token_filter().clone());
                let units_a: Vec<NGram> = grams_a.collect();
                let units_b: Vec<NGram> = grams_b.collect();
                debug!(ngrams_a = units_a.len(), ngrams_b = units_b.len(), "n-grams extracted");

                let found = match_units(&units_a, &units_b, cfg.matcher.threshold, cfg.matcher.use_parallel, cancel)?;
                (to_matches(found, OffsetSpace::Tokens, &doc_b.doc_id), Some(filters))
            }
            MatchStrategy::Sentence => {
                let (units_a, cut_a) = sentence_units(&doc_a, &cfg.matcher);
                let (units_b, cut_b) = sentence_units(&doc_b, &cfg.matcher);
                sentences_truncated = cut_a || cut_b;
                debug!(sentences_a = units_a.len(), sentences_b = units_b.len(), "sentences extracted");

                let found = match_units(
                    &units_a,
                    &units_b,
                    cfg.matcher.sentence_threshold,
                    cfg.matcher.use_parallel,
                    cancel,
                )?;
                (to_matches(found, OffsetSpace::Chars, &doc_b.doc_id), None)
            }
        };

        let tokens_truncated = filters
            .as_ref()
            .is_some_and(|(fa, fb)| fa.truncated || fb.truncated);
        if tokens_truncated {
            warn!(
                document_a = %a.name,
                document_b = %b.name,
                max_tokens = cfg.ngram.max_tokens,
                "document exceeds token cap; comparing the leading part only"
            );
        }
        if sentences_truncated {
            warn!(
                document_a = %a.name,
                document_b = %b.name,
                max_sentences = cfg.matcher.max_sentences,
                "document exceeds sentence cap; comparing the leading part only"
            );
        }
        let truncated = tokens_truncated || sentences_truncated;

        let side_a = PairSide {
            doc: &doc_a,
            kept: filters.as_ref().map(|(fa, _)| fa),
        };
        let side_b = PairSide {
            doc: &doc_b,
            kept: filters.as_ref().map(|(_, fb)| fb),
        };
        let proposed = sanitize_external(external, side_a, side_b, primary, &cfg.score.bands);

        let candidates = local.len() + proposed.len();
        let mut merged = local;
        merged.extend(proposed);
        let mut accepted = reduce::select(merged, cfg.reduce.window);
        for m in accepted.iter_mut().filter(|m| m.origin == MatchOrigin::Local) {
            fill_surface(m, side_a, side_b);
        }

        let similarity = score_tokens(&accepted, &doc_a.tokens, &doc_b.tokens, &cfg.score);
        let accepted_count = accepted.len();

        let mut matches = reduce::finish(accepted, cfg.reduce.max_results);
        for (rank, m) in matches.iter_mut().enumerate() {
            m.kind = m.kind.or_else(|| cfg.score.bands.classify(m.similarity));
            m.color = Some(MATCH_COLORS[rank % MATCH_COLORS.len()].to_string());
        }

        debug!(
            document_a = %a.name,
            document_b = %b.name,
            candidates,
            accepted = accepted_count,
            reported = matches.len(),
            similarity,
            "pair compared"
        );

        Ok(PairResult {
            document_a: a.name.clone(),
            document_b: b.name.clone(),
            similarity,
            total_matches: matches.len(),
            matches,
            status: AnalysisStatus::Completed,
            error: None,
            truncated,
        })
    }
}

fn check_input(documents: &[Document]) -> Result<(), DetectError> {
    if documents.len() < 2 {
        return Err(DetectError::InsufficientInput {
            got: documents.len(),
        });
    }
    Ok(())
}

/// Index pairs to compare, primary pair first.
fn pair_indices(count: usize, policy: BatchPolicy) -> Vec<(usize, usize)> {
    match policy {
        BatchPolicy::AgainstPrimary => (1..count).map(|j| (0, j)).collect(),
        BatchPolicy::Exhaustive => (0..count)
            .flat_map(|i| (i + 1..count).map(move |j| (i, j)))
            .collect(),
    }
}

/// Comparable sentences of `doc`, at most `max_sentences` of them. The flag
/// reports whether any were cut.
fn sentence_units(doc: &CanonicalizedDocument, cfg: &MatcherConfig) -> (Vec<SentenceUnit>, bool) {
    let mut units: Vec<SentenceUnit> = split_sentences(&doc.source)
        .iter()
        .map(SentenceUnit::from_sentence)
        .filter(|unit| unit.normalized.chars().count() >= cfg.min_sentence_chars)
        .take(cfg.max_sentences + 1)
        .collect();
    let truncated = units.len() > cfg.max_sentences;
    units.truncate(cfg.max_sentences);
    (units, truncated)
}

fn to_matches(found: Vec<Candidate>, offsets: OffsetSpace, source_document: &str) -> Vec<Match> {
    found
        .into_iter()
        .map(|c| Match {
            original_text: String::new(),
            matched_text: String::new(),
            similarity: (c.similarity * 100.0) as f32,
            start_a: c.start_a,
            end_a: c.end_a,
            start_b: c.start_b,
            end_b: c.end_b,
            offsets,
            source_document: source_document.to_string(),
            kind: None,
            color: None,
            origin: MatchOrigin::Local,
        })
        .collect()
}

fn fill_surface(m: &mut Match, a: PairSide<'_>, b: PairSide<'_>) {
    match (m.offsets, a.kept, b.kept) {
        (OffsetSpace::Tokens, Some(kept_a), Some(kept_b)) => {
            m.original_text = token_surface(a.doc, kept_a, m.start_a, m.end_a);
            m.matched_text = token_surface(b.doc, kept_b, m.start_b, m.end_b);
        }
        _ => {
            m.original_text = a.doc.slice_chars(m.start_a, m.end_a);
            m.matched_text = b.doc.slice_chars(m.start_b, m.end_b);
        }
    }
}

/// Raw text of post-filter tokens `start..end`, widened over the short
/// tokens the filter dropped between the span and its kept neighbours
/// (or the document edge).
fn token_surface(doc: &CanonicalizedDocument, filter: &TokenFilter, start: usize, end: usize) -> String {
    let kept = &filter.kept;
    if start >= end || end > kept.len() {
        return String::new();
    }
    let first = if start == 0 { 0 } else { kept[start - 1] + 1 };
    let last = if end < kept.len() {
        kept[end] - 1
    } else if filter.truncated {
        kept[end - 1]
    } else {
        doc.tokens.len() - 1
    };
    doc.surface(first, last + 1)
}
