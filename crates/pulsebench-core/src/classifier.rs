// Retry classification
//
// Decision: classification is a trait so provider-specific policies (e.g.
// treating 429 as terminal, or capping the backoff) can be substituted
// without touching the executor.

use std::time::Duration;

use crate::config::BenchmarkConfig;
use crate::error::FailureKind;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the given duration, then try again
    Retry(Duration),
    /// Give up on this logical request
    Abort,
}

/// Maps a failed attempt to a retry decision.
///
/// `attempts_made` is the 1-based count of attempts already performed,
/// including the one that just failed.
pub trait OutcomeClassifier: Send + Sync {
    fn classify(&self, kind: FailureKind, attempts_made: u32) -> RetryDecision;
}

/// Default policy: deterministic exponential backoff, no jitter, no cap.
///
/// The wait before attempt `n + 1` is `base_delay * 2^(n-1)`, so identical
/// inputs reproduce identical timing sequences.
///
/// Authentication failures are never transient and abort immediately, as do
/// malformed payloads (a broken response shape will not fix itself on
/// retry). Everything else retries while the budget lasts; `Unknown` is
/// retried too, since an unclassifiable failure is more often transient
/// than not.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max_retries: u32,
    base_delay: Duration,
}

impl ExponentialBackoff {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Build the policy a config describes.
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay)
    }

    fn backoff(&self, attempts_made: u32) -> Duration {
        // attempts_made >= 1 when a failure is being classified
        self.base_delay * 2u32.saturating_pow(attempts_made - 1)
    }
}

impl OutcomeClassifier for ExponentialBackoff {
    fn classify(&self, kind: FailureKind, attempts_made: u32) -> RetryDecision {
        match kind {
            FailureKind::Authentication | FailureKind::Malformed => RetryDecision::Abort,
            FailureKind::Connection
            | FailureKind::Timeout
            | FailureKind::RateLimit
            | FailureKind::ServerError
            | FailureKind::Unknown => {
                if attempts_made <= self.max_retries {
                    RetryDecision::Retry(self.backoff(attempts_made))
                } else {
                    RetryDecision::Abort
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_never_retries() {
        let policy = ExponentialBackoff::new(5, Duration::from_secs(1));
        assert_eq!(
            policy.classify(FailureKind::Authentication, 1),
            RetryDecision::Abort
        );
    }

    #[test]
    fn test_malformed_never_retries() {
        let policy = ExponentialBackoff::new(5, Duration::from_secs(1));
        assert_eq!(
            policy.classify(FailureKind::Malformed, 1),
            RetryDecision::Abort
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = ExponentialBackoff::new(4, Duration::from_secs(1));

        assert_eq!(
            policy.classify(FailureKind::Timeout, 1),
            RetryDecision::Retry(Duration::from_secs(1))
        );
        assert_eq!(
            policy.classify(FailureKind::Timeout, 2),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            policy.classify(FailureKind::Timeout, 3),
            RetryDecision::Retry(Duration::from_secs(4))
        );
        assert_eq!(
            policy.classify(FailureKind::Timeout, 4),
            RetryDecision::Retry(Duration::from_secs(8))
        );
    }

    #[test]
    fn test_budget_exhaustion() {
        let policy = ExponentialBackoff::new(3, Duration::from_secs(1));
        assert!(matches!(
            policy.classify(FailureKind::ServerError, 3),
            RetryDecision::Retry(_)
        ));
        assert_eq!(
            policy.classify(FailureKind::ServerError, 4),
            RetryDecision::Abort
        );
    }

    #[test]
    fn test_zero_retries() {
        let policy = ExponentialBackoff::new(0, Duration::from_secs(1));
        assert_eq!(
            policy.classify(FailureKind::Timeout, 1),
            RetryDecision::Abort
        );
    }

    #[test]
    fn test_unknown_is_retryable() {
        let policy = ExponentialBackoff::new(2, Duration::from_millis(500));
        assert_eq!(
            policy.classify(FailureKind::Unknown, 1),
            RetryDecision::Retry(Duration::from_millis(500))
        );
    }
}
