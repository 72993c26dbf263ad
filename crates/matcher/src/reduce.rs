//! Match reduction: collapse duplicates so each region is reported once.
//!
//! Candidates are ranked by similarity and accepted greedily; a candidate
//! whose A start or B start lies within `window` of an accepted match is a
//! duplicate of it. Single-threaded: it must see the full candidate set.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::ReduceConfig;
use crate::types::{Match, MatchOrigin, OffsetSpace};

/// Drop malformed candidates, merge verbatim runs, then greedily keep the
/// strongest match per region. Output is in acceptance order.
pub fn select(candidates: Vec<Match>, window: usize) -> Vec<Match> {
    let total = candidates.len();
    let mut well_formed: Vec<Match> = candidates
        .into_iter()
        .filter(Match::is_well_formed)
        .collect();
    let dropped = total - well_formed.len();
    if dropped > 0 {
        debug!(dropped, "discarded malformed match candidates");
    }

    well_formed = coalesce_verbatim_runs(well_formed);
    well_formed.sort_by(rank);

    let mut accepted: Vec<Match> = Vec::new();
    for candidate in well_formed {
        let duplicate = accepted.iter().any(|kept| {
            kept.start_a.abs_diff(candidate.start_a) < window
                || kept.start_b.abs_diff(candidate.start_b) < window
        });
        if !duplicate {
            accepted.push(candidate);
        }
    }
    accepted
}

/// Cap accepted matches at `max_results` and put them in document-A order.
pub fn finish(mut accepted: Vec<Match>, max_results: usize) -> Vec<Match> {
    accepted.truncate(max_results);
    accepted.sort_by_key(|m| m.start_a);
    accepted
}

/// [`select`] followed by [`finish`].
pub fn reduce(candidates: Vec<Match>, cfg: &ReduceConfig) -> Vec<Match> {
    finish(select(candidates, cfg.window), cfg.max_results)
}

/// Higher similarity first, then earliest A start.
fn rank(a: &Match, b: &Match) -> Ordering {
    b.similarity
        .partial_cmp(&a.similarity)
        .unwrap_or(Ordering::Equal)
        .then(a.start_a.cmp(&b.start_a))
        .then(a.start_b.cmp(&b.start_b))
}

fn is_verbatim(m: &Match) -> bool {
    m.similarity >= 100.0 && m.offsets == OffsetSpace::Tokens && m.origin == MatchOrigin::Local
}

/// Identical n-grams on one diagonal (same B-A shift) that overlap or touch
/// describe one longer copied passage. Merge them into a single match so
/// the passage is reported, and counted, whole.
fn coalesce_verbatim_runs(candidates: Vec<Match>) -> Vec<Match> {
    let (mut verbatim, mut rest): (Vec<Match>, Vec<Match>) =
        candidates.into_iter().partition(is_verbatim);
    if verbatim.len() < 2 {
        rest.append(&mut verbatim);
        return rest;
    }

    let diagonal = |m: &Match| m.start_b as i64 - m.start_a as i64;
    verbatim.sort_by_key(|m| (diagonal(m), m.start_a));

    let mut runs: Vec<Match> = Vec::with_capacity(verbatim.len());
    for m in verbatim {
        match runs.last_mut() {
            Some(run) if diagonal(run) == diagonal(&m) && m.start_a <= run.end_a => {
                run.end_a = run.end_a.max(m.end_a);
                run.end_b = run.end_b.max(m.end_b);
            }
            _ => runs.push(m),
        }
    }

    rest.extend(runs);
    rest
}
