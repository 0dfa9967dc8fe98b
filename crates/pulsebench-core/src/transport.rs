// Transport abstraction
//
// Decision: the engine never talks HTTP directly. A ChatTransport turns one
// chat request into status + body + elapsed time (or a transport error), and
// everything above it is deterministic and unit-testable.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// One chat-completion request as the engine sees it.
///
/// Header construction, payload shape, and endpoint joining are the
/// transport's responsibility.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub timeout: Duration,
}

/// Raw result of one physical send.
///
/// `elapsed` covers the full exchange up to the last body byte. Non-2xx
/// statuses are returned here, not as errors; only failures that prevented
/// an HTTP response (connect, timeout, TLS) become `TransportError`.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

/// A blocking "send one request, observe one response" operation.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError>;
}
