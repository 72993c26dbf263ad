//! Overall similarity score for one comparison.
//!
//! Blends how much of the average document length the matches cover with
//! how much vocabulary the two documents share. No matches means no score:
//! vocabulary overlap alone is not evidence.

use std::collections::HashSet;

use crate::config::ScoreConfig;
use crate::types::Match;

/// Score two raw texts against their matches. Returns `0..=100`.
pub fn aggregate(matches: &[Match], text_a: &str, text_b: &str, cfg: &ScoreConfig) -> u8 {
    let norm_a = canonical::normalize(text_a);
    let norm_b = canonical::normalize(text_b);
    let tokens_a: Vec<&str> = norm_a.split_whitespace().collect();
    let tokens_b: Vec<&str> = norm_b.split_whitespace().collect();
    score_tokens(matches, &tokens_a, &tokens_b, cfg)
}

/// Same as [`aggregate`] for documents that are already tokenized.
pub fn score_tokens<S: AsRef<str>>(matches: &[Match], tokens_a: &[S], tokens_b: &[S], cfg: &ScoreConfig) -> u8 {
    if matches.is_empty() {
        return 0;
    }

    let coverage = coverage_score(matches, tokens_a.len(), tokens_b.len());
    let jaccard = jaccard_score(tokens_a, tokens_b, cfg.jaccard_min_token_chars);
    let blended = cfg.coverage_weight * coverage + cfg.jaccard_weight * jaccard;

    blended.clamp(0.0, 100.0).round() as u8
}

/// Matched tokens as a percentage of the average document length. May
/// exceed 100 when matches overlap; the blend clamps.
pub fn coverage_score(matches: &[Match], len_a: usize, len_b: usize) -> f64 {
    let average = (len_a + len_b) as f64 / 2.0;
    if average == 0.0 {
        return 0.0;
    }
    let matched: usize = matches.iter().map(|m| token_count(&m.original_text)).sum();
    matched as f64 / average * 100.0
}

/// `|A ∩ B| / |A ∪ B| * 100` over the sets of tokens with at least
/// `min_chars` characters. Two empty sets score 0.
pub fn jaccard_score<S: AsRef<str>>(tokens_a: &[S], tokens_b: &[S], min_chars: usize) -> f64 {
    let vocabulary = |tokens: &[S]| -> HashSet<String> {
        tokens
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| t.chars().count() >= min_chars)
            .map(str::to_owned)
            .collect()
    };
    let set_a = vocabulary(tokens_a);
    let set_b = vocabulary(tokens_b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64 * 100.0
}

fn token_count(text: &str) -> usize {
    canonical::normalize(text).split_whitespace().count()
}
