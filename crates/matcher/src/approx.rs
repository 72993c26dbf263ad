//! All-pairs approximate matching over comparison units.
//!
//! Every unit of A is compared with every unit of B by normalized
//! character edit distance. The loop is O(|A| x |B|) edit-distance calls;
//! callers bound the input (see `NGramConfig::max_tokens`).

use canonical::Sentence;
use ngram::NGram;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::types::MatchError;

/// Something the matcher can compare: normalized text plus its span in
/// the owning document.
pub trait Unit {
    fn text(&self) -> &str;
    fn span(&self) -> (usize, usize);
}

impl Unit for NGram {
    fn text(&self) -> &str {
        &self.text
    }

    fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// A sentence prepared for comparison: normalized text, raw char span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceUnit {
    pub normalized: String,
    pub start: usize,
    pub end: usize,
}

impl SentenceUnit {
    pub fn from_sentence(sentence: &Sentence) -> Self {
        Self {
            normalized: canonical::normalize(&sentence.text),
            start: sentence.start,
            end: sentence.end,
        }
    }
}

impl Unit for SentenceUnit {
    fn text(&self) -> &str {
        &self.normalized
    }

    fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// A pair of units whose similarity reached the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub start_a: usize,
    pub end_a: usize,
    pub start_b: usize,
    pub end_b: usize,
    /// Normalized similarity in `[0, 1]`.
    pub similarity: f64,
}

/// `(maxLen - levenshtein(a, b)) / maxLen` over chars; two empty strings
/// are identical.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    similarity_with_lengths(a, b, len_a, len_b)
}

fn similarity_with_lengths(a: &str, b: &str, len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Best similarity two strings of these lengths could reach: the length
/// difference alone costs that many edits.
#[inline]
fn similarity_upper_bound(len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    (max_len - len_a.abs_diff(len_b)) as f64 / max_len as f64
}

/// Compare every unit of `a` with every unit of `b` and return the pairs
/// with `similarity >= threshold`, in no particular order.
///
/// `cancel` is checked once per unit of `a`; a cancelled run returns
/// [`MatchError::Cancelled`] and drops whatever was found so far.
pub fn match_units<U>(
    a: &[U],
    b: &[U],
    threshold: f64,
    use_parallel: bool,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, MatchError>
where
    U: Unit + Sync,
{
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(MatchError::InvalidConfig(format!(
            "threshold must be in (0, 1] (got {threshold})"
        )));
    }
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }

    let lens_b: Vec<usize> = b.iter().map(|u| u.text().chars().count()).collect();
    let row = |unit_a: &U| -> Option<Vec<Candidate>> {
        if cancel.is_cancelled() {
            return None;
        }
        Some(match_row(unit_a, b, &lens_b, threshold))
    };

    let rows: Option<Vec<Vec<Candidate>>> = if use_parallel {
        a.par_iter().map(row).collect()
    } else {
        a.iter().map(row).collect()
    };

    match rows {
        Some(rows) if !cancel.is_cancelled() => Ok(rows.into_iter().flatten().collect()),
        _ => Err(MatchError::Cancelled),
    }
}

fn match_row<U: Unit>(unit_a: &U, b: &[U], lens_b: &[usize], threshold: f64) -> Vec<Candidate> {
    let text_a = unit_a.text();
    let len_a = text_a.chars().count();
    let (start_a, end_a) = unit_a.span();
    let mut out = Vec::new();

    for (unit_b, &len_b) in b.iter().zip(lens_b) {
        if similarity_upper_bound(len_a, len_b) < threshold {
            continue;
        }
        let similarity = similarity_with_lengths(text_a, unit_b.text(), len_a, len_b);
        if similarity >= threshold {
            let (start_b, end_b) = unit_b.span();
            out.push(Candidate {
                start_a,
                end_a,
                start_b,
                end_b,
                similarity,
            });
        }
    }
    out
}
