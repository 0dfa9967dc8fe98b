// In-memory implementations for examples and testing
//
// A scripted transport replays canned responses in order; a manual clock
// records requested sleeps instead of waiting. Together they make retry
// timing assertions exact.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::clock::Clock;
use crate::error::TransportError;
use crate::transport::{ChatRequest, ChatTransport, TransportResponse};

/// Build a minimal well-formed chat-completion body.
pub fn chat_completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{
            "message": {"role": "assistant", "content": content}
        }],
        "usage": {"prompt_tokens": 5, "completion_tokens": 7}
    })
    .to_string()
}

/// Transport that replays a scripted sequence of results.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next send.
    pub fn push_response(&self, response: TransportResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport-level error for the next send.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Queue a successful 200 exchange with the given elapsed time.
    pub fn push_success(&self, elapsed: Duration) {
        self.push_response(TransportResponse {
            status: 200,
            body: chat_completion_body("ok"),
            elapsed,
        });
    }

    /// Number of sends not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::unknown("scripted transport exhausted")))
    }
}

/// Clock that records sleeps and returns immediately.
#[derive(Default)]
pub struct ManualClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
