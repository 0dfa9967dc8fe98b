// Request executor
//
// Runs one logical request to completion: attempt, classify, back off,
// retry, until a terminal state is reached. The retry sequence is an
// explicit loop over AttemptResult values rather than recursive error
// handling, so attempt counts and waits stay auditable in tests.

use std::time::Duration;

use serde_json::Value;

use crate::classifier::{OutcomeClassifier, RetryDecision};
use crate::clock::Clock;
use crate::error::FailureKind;
use crate::outcome::RequestOutcome;
use crate::transport::{ChatRequest, ChatTransport, TransportResponse};

/// How many characters of body/content to carry into log messages.
const SAMPLE_LEN: usize = 80;

/// Outcome of one physical attempt.
#[derive(Debug, Clone)]
pub enum AttemptResult {
    Success {
        /// Elapsed time of this attempt only
        latency: Duration,
        /// Short sample of the assistant's reply, for logging
        sample: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

/// Interpret a transport response as an attempt outcome.
///
/// A 2xx status with a `choices[0].message.content` string is a success;
/// a 2xx status with anything else is `Malformed`. Non-2xx statuses map
/// onto the failure taxonomy by status family.
pub fn evaluate_response(response: &TransportResponse) -> AttemptResult {
    if !(200..300).contains(&response.status) {
        return AttemptResult::Failure {
            kind: FailureKind::from_status(response.status),
            message: format!(
                "endpoint returned status {}: {}",
                response.status,
                truncate(&response.body)
            ),
        };
    }

    let value: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(err) => {
            return AttemptResult::Failure {
                kind: FailureKind::Malformed,
                message: format!("response body is not valid JSON: {}", err),
            }
        }
    };

    match value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        Some(content) => AttemptResult::Success {
            latency: response.elapsed,
            sample: truncate(content),
        },
        None => AttemptResult::Failure {
            kind: FailureKind::Malformed,
            message: "response missing choices[0].message.content".to_string(),
        },
    }
}

fn truncate(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SAMPLE_LEN {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SAMPLE_LEN).collect();
        format!("{}...", cut)
    }
}

/// Drives one logical request through its retry sequence.
pub struct RequestExecutor<'a> {
    transport: &'a dyn ChatTransport,
    classifier: &'a dyn OutcomeClassifier,
    clock: &'a dyn Clock,
    attempt_limit: u32,
}

impl<'a> RequestExecutor<'a> {
    /// `attempt_limit` is the maximum number of physical attempts,
    /// typically `max_retries + 1`. It bounds the loop even if a custom
    /// classifier never aborts.
    pub fn new(
        transport: &'a dyn ChatTransport,
        classifier: &'a dyn OutcomeClassifier,
        clock: &'a dyn Clock,
        attempt_limit: u32,
    ) -> Self {
        Self {
            transport,
            classifier,
            clock,
            attempt_limit: attempt_limit.max(1),
        }
    }

    /// Run one logical request to its terminal state.
    ///
    /// Produces exactly one outcome. The reported latency is the elapsed
    /// time of the successful attempt only, never cumulative retry time.
    pub async fn execute(&self, index: usize, request: &ChatRequest) -> RequestOutcome {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let attempt = match self.transport.send(request).await {
                Ok(response) => evaluate_response(&response),
                Err(err) => AttemptResult::Failure {
                    kind: err.kind,
                    message: err.message,
                },
            };

            match attempt {
                AttemptResult::Success { latency, sample } => {
                    tracing::debug!(
                        index,
                        attempts,
                        latency_ms = latency.as_millis() as u64,
                        sample = %sample,
                        "request succeeded"
                    );
                    return RequestOutcome::success(index, latency, attempts);
                }
                AttemptResult::Failure { kind, message } => {
                    tracing::warn!(index, attempts, %kind, "attempt failed: {}", message);

                    if attempts >= self.attempt_limit {
                        return RequestOutcome::failed(index, kind, attempts);
                    }
                    match self.classifier.classify(kind, attempts) {
                        RetryDecision::Retry(wait) => {
                            tracing::debug!(
                                index,
                                wait_ms = wait.as_millis() as u64,
                                "backing off before retry"
                            );
                            self.clock.sleep(wait).await;
                        }
                        RetryDecision::Abort => {
                            return RequestOutcome::failed(index, kind, attempts);
                        }
                    }
                }
            }
        }
    }
}
