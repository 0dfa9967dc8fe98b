// Benchmark runner
//
// Drives the configured number of logical requests strictly sequentially,
// with a pacing delay between them, and reduces the outcomes once at the
// end. Individual request failures are data, not errors: the runner always
// attempts every configured request.

use std::sync::Arc;
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::classifier::{ExponentialBackoff, OutcomeClassifier};
use crate::clock::{Clock, TokioClock};
use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::histogram::{HistogramBuckets, DEFAULT_BUCKET_COUNT};
use crate::outcome::{BenchmarkResult, RequestOutcome};
use crate::stats::LatencyStatistics;
use crate::transport::{ChatRequest, ChatTransport};

/// Runs benchmarks against a transport.
///
/// The runner holds no per-run state; one instance can serve many
/// concurrent `run` calls from a serving front-end, each with its own
/// config.
pub struct BenchmarkRunner {
    transport: Arc<dyn ChatTransport>,
    clock: Arc<dyn Clock>,
    classifier: Option<Arc<dyn OutcomeClassifier>>,
}

impl BenchmarkRunner {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            clock: Arc::new(TokioClock),
            classifier: None,
        }
    }

    /// Substitute the clock (used by tests to observe sleeps).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Substitute the retry policy. By default each run builds an
    /// `ExponentialBackoff` from its config.
    pub fn with_classifier(mut self, classifier: Arc<dyn OutcomeClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Run one benchmark to completion.
    ///
    /// Validates the config up front, then issues `num_requests` logical
    /// requests one at a time. Outcomes are accumulated in request-issue
    /// order; statistics and histogram are computed from the successful
    /// subset after the final request.
    pub async fn run(&self, config: &BenchmarkConfig) -> Result<BenchmarkResult> {
        config.validate()?;

        let classifier: Arc<dyn OutcomeClassifier> = match &self.classifier {
            Some(classifier) => classifier.clone(),
            None => Arc::new(ExponentialBackoff::from_config(config)),
        };
        let executor = RequestExecutor::new(
            self.transport.as_ref(),
            classifier.as_ref(),
            self.clock.as_ref(),
            config.max_retries + 1,
        );

        tracing::info!(
            endpoint = %config.endpoint,
            model = %config.model,
            num_requests = config.num_requests,
            "starting benchmark"
        );

        let mut outcomes: Vec<RequestOutcome> = Vec::with_capacity(config.num_requests);
        for index in 0..config.num_requests {
            let request = ChatRequest {
                model: config.model.clone(),
                prompt: self.prompt_for(config),
                timeout: config.timeout,
            };

            let outcome = executor.execute(index, &request).await;
            match outcome.latency {
                Some(latency) => tracing::info!(
                    request = index + 1,
                    total = config.num_requests,
                    latency_ms = latency.as_millis() as u64,
                    attempts = outcome.attempts,
                    "request completed"
                ),
                None => tracing::warn!(
                    request = index + 1,
                    total = config.num_requests,
                    attempts = outcome.attempts,
                    failure = ?outcome.failure,
                    "request failed"
                ),
            }
            outcomes.push(outcome);

            // Pace between logical requests, never after the last one
            if index + 1 < config.num_requests {
                self.clock.sleep(config.request_delay).await;
            }
        }

        let latencies: Vec<Duration> = outcomes.iter().filter_map(|o| o.latency).collect();
        let failures = outcomes.len() - latencies.len();
        let statistics = LatencyStatistics::compute(&latencies, failures);
        let histogram = HistogramBuckets::from_latencies(&latencies, DEFAULT_BUCKET_COUNT);

        tracing::info!(
            successes = statistics.successes,
            failures = statistics.failures,
            "benchmark complete"
        );

        Ok(BenchmarkResult {
            outcomes,
            statistics,
            histogram,
        })
    }

    fn prompt_for(&self, config: &BenchmarkConfig) -> String {
        if config.randomize_prompt {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            format!("{} [rnd:{}]", config.prompt, suffix)
        } else {
            config.prompt.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, TransportError};
    use crate::outcome::OutcomeStatus;
    use crate::testing::{ManualClock, ScriptedTransport};

    fn config(num_requests: usize) -> BenchmarkConfig {
        BenchmarkConfig::new("https://api.example.com", "sk-test")
            .with_num_requests(num_requests)
            .with_request_delay(Duration::from_secs(2))
            .with_retry_delay(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_outcome_count_matches_config() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..5 {
            transport.push_success(Duration::from_millis(100));
        }
        let runner =
            BenchmarkRunner::new(transport.clone()).with_clock(Arc::new(ManualClock::new()));

        let result = runner.run(&config(5)).await.unwrap();
        assert_eq!(result.outcomes.len(), 5);
        assert!(result.outcomes.iter().all(|o| o.is_success()));
        // Order is request-issue order
        let indices: Vec<usize> = result.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_pacing_between_requests_only() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..3 {
            transport.push_success(Duration::from_millis(100));
        }
        let clock = Arc::new(ManualClock::new());
        let runner = BenchmarkRunner::new(transport).with_clock(clock.clone());

        runner.run(&config(3)).await.unwrap();
        // Two pacing sleeps for three requests, none after the last
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_run() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(Duration::from_millis(100));
        // Request 2: auth failure, aborts immediately
        transport.push_error(TransportError::new(FailureKind::Authentication, "denied"));
        transport.push_success(Duration::from_millis(300));
        let mut cfg = config(3);
        cfg.max_retries = 0;

        let runner = BenchmarkRunner::new(transport).with_clock(Arc::new(ManualClock::new()));
        let result = runner.run(&cfg).await.unwrap();

        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.outcomes[1].status, OutcomeStatus::Failed);
        assert_eq!(result.statistics.successes, 2);
        assert_eq!(result.statistics.failures, 1);
    }

    #[tokio::test]
    async fn test_retry_then_pacing_sleep_sequence() {
        let transport = Arc::new(ScriptedTransport::new());
        // Request 1: one 500 then success; request 2: immediate success
        transport.push_response(crate::transport::TransportResponse {
            status: 500,
            body: "{}".to_string(),
            elapsed: Duration::from_millis(50),
        });
        transport.push_success(Duration::from_millis(100));
        transport.push_success(Duration::from_millis(100));
        let clock = Arc::new(ManualClock::new());
        let runner = BenchmarkRunner::new(transport).with_clock(clock.clone());

        let result = runner.run(&config(2)).await.unwrap();
        assert_eq!(result.outcomes[0].attempts, 2);
        // Backoff (1s) then pacing (2s)
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_all_failed_yields_absent_summary_and_no_data_histogram() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..2 {
            transport.push_error(TransportError::connection("refused"));
        }
        let mut cfg = config(2);
        cfg.max_retries = 0;

        let runner = BenchmarkRunner::new(transport).with_clock(Arc::new(ManualClock::new()));
        let result = runner.run(&cfg).await.unwrap();

        assert_eq!(result.statistics.successes, 0);
        assert_eq!(result.statistics.failures, 2);
        assert!(result.statistics.summary.is_none());
        assert_eq!(result.histogram.render(), "No data to display");
    }

    #[tokio::test]
    async fn test_identical_latencies_fill_one_bucket() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..5 {
            transport.push_success(Duration::from_secs(1));
        }
        let runner = BenchmarkRunner::new(transport).with_clock(Arc::new(ManualClock::new()));

        let result = runner.run(&config(5)).await.unwrap();
        let non_empty: Vec<_> = result
            .histogram
            .buckets
            .iter()
            .filter(|b| b.count > 0)
            .collect();
        assert_eq!(non_empty.len(), 1);
        assert_eq!(non_empty[0].count, 5);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(Duration::from_millis(100));
        let runner =
            BenchmarkRunner::new(transport.clone()).with_clock(Arc::new(ManualClock::new()));

        let result = runner.run(&config(0)).await;
        assert!(result.is_err());
        // No request was consumed
        assert_eq!(transport.remaining(), 1);
    }

    #[tokio::test]
    async fn test_randomized_prompts_stay_distinct() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(Duration::from_millis(10));
        let mut cfg = config(1);
        cfg.randomize_prompt = true;

        let runner = BenchmarkRunner::new(transport).with_clock(Arc::new(ManualClock::new()));
        let prompt_a = runner.prompt_for(&cfg);
        let prompt_b = runner.prompt_for(&cfg);
        assert!(prompt_a.starts_with(&cfg.prompt));
        assert!(prompt_a.contains("[rnd:"));
        assert_ne!(prompt_a, prompt_b);
    }
}
