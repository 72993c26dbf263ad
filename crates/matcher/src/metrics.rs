// Metrics hooks for the detector.
//
// A `DetectionMetrics` implementation is handed to `Detector::with_metrics`;
// every analysis then reports its latency, the number of pairwise
// comparisons and the number of matches returned. Nothing is global: two
// detectors can report to different backends.
use std::time::Duration;

use crate::types::AnalysisStatus;

/// Metrics observer for analyses.
pub trait DetectionMetrics: Send + Sync {
    /// Record one finished analysis.
    ///
    /// `pairs` is the number of pairwise comparisons performed, `matches`
    /// the number of matches reported for the primary pair, `status` the
    /// primary pair's outcome.
    fn record_analysis(&self, pairs: usize, matches: usize, status: AnalysisStatus, latency: Duration);

    /// Record that the external source failed or timed out.
    fn record_external_failure(&self, _source: &str) {}
}
