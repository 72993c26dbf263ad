//! Retry with exponential backoff for transient source failures.
//!
//! [`Retrying`] wraps any [`MatchSource`] and repeats the call when the
//! error is transient (transport failures, 429, 5xx). Permanent errors are
//! returned on the first attempt.

use std::time::Duration;

use async_trait::async_trait;
use matcher::{Document, ExternalMatch, MatchSource, SourceError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts after the first one. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every attempt.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    /// Add up to 50% random jitter to every delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt + 1`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
        let delay = exponential.min(self.max_delay.as_millis() as u64);

        if self.jitter {
            let jitter = fastrand::u64(0..=delay / 2);
            Duration::from_millis(delay + jitter)
        } else {
            Duration::from_millis(delay)
        }
    }
}

/// A [`MatchSource`] that retries its inner source on transient errors.
#[derive(Debug, Clone)]
pub struct Retrying<S> {
    inner: S,
    config: RetryConfig,
}

impl<S> Retrying<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: MatchSource> MatchSource for Retrying<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn propose_matches(&self, documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError> {
        let mut attempt = 0;
        loop {
            match self.inner.propose_matches(documents).await {
                Ok(entries) => return Ok(entries),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.delay_for(attempt);
                    warn!(
                        source = self.inner.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying match source"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        status: u16,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, status: u16) -> Self {
            Self {
                failures,
                status,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MatchSource for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn propose_matches(&self, _documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SourceError::Status {
                    status: self.status,
                    body: "try later".into(),
                })
            } else {
                Ok(vec![ExternalMatch::default()])
            }
        }
    }

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(10))
            .with_jitter(false)
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried() {
        let source = Retrying::new(Flaky::new(2, 503), fast(3));
        let out = source.propose_matches(&[]).await.expect("third attempt succeeds");
        assert_eq!(out.len(), 1);
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let source = Retrying::new(Flaky::new(10, 429), fast(2));
        let err = source.propose_matches(&[]).await.expect_err("always failing");
        assert!(matches!(err, SourceError::Status { status: 429, .. }));
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_fail_fast() {
        let source = Retrying::new(Flaky::new(1, 401), fast(5));
        assert!(source.propose_matches(&[]).await.is_err());
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_config_does_not_retry() {
        let source = Retrying::new(Flaky::new(1, 503), RetryConfig::default());
        assert!(source.propose_matches(&[]).await.is_err());
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_grows_and_caps() {
        let cfg = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(350))
            .with_jitter(false);
        assert_eq!(cfg.delay_for(0), Duration::from_millis(100));
        assert_eq!(cfg.delay_for(1), Duration::from_millis(200));
        assert_eq!(cfg.delay_for(2), Duration::from_millis(350));
        assert_eq!(cfg.delay_for(40), Duration::from_millis(350));
    }

    #[test]
    fn jitter_stays_within_half() {
        let cfg = RetryConfig::default().with_base_delay(Duration::from_millis(100));
        for _ in 0..50 {
            let delay = cfg.delay_for(0);
            assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(150));
        }
    }

    #[test]
    fn serde_uses_milliseconds() {
        let cfg: RetryConfig = serde_json::from_str(r#"{"max_retries":2,"base_delay":50}"#).unwrap();
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.base_delay, Duration::from_millis(50));
        assert_eq!(cfg.max_delay, Duration::from_secs(5));
    }
}
