// Error types for the benchmark engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for benchmark engine operations
pub type Result<T> = std::result::Result<T, BenchmarkError>;

/// Errors that abort a benchmark before any request is issued.
///
/// Per-request failures never surface here: the executor absorbs them into
/// `RequestOutcome`s and the benchmark always runs to completion.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// Configuration invariant violation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BenchmarkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        BenchmarkError::Configuration(msg.into())
    }
}

/// Classification of a failed attempt.
///
/// `Authentication` and `Malformed` are terminal; the remaining kinds are
/// transient and eligible for retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Could not reach the endpoint (DNS, refused connection, TLS handshake)
    Connection,
    /// The request exceeded the configured timeout
    Timeout,
    /// The endpoint rejected the credential (401/403)
    Authentication,
    /// The endpoint signaled throttling (429)
    RateLimit,
    /// The endpoint failed internally (5xx)
    ServerError,
    /// 2xx exchange whose payload did not have the expected shape
    Malformed,
    /// Anything else
    Unknown,
}

impl FailureKind {
    /// Map a non-2xx HTTP status to a failure kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FailureKind::Authentication,
            429 => FailureKind::RateLimit,
            500..=599 => FailureKind::ServerError,
            _ => FailureKind::Unknown,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Connection => "connection",
            FailureKind::Timeout => "timeout",
            FailureKind::Authentication => "authentication",
            FailureKind::RateLimit => "rate_limit",
            FailureKind::ServerError => "server_error",
            FailureKind::Malformed => "malformed",
            FailureKind::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Transport-level failure: the request never produced an HTTP response.
///
/// Non-2xx statuses are not transport errors; they come back as a
/// `TransportResponse` and are classified by the executor.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(FailureKind::Connection, msg)
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, msg)
    }

    /// Create an unknown transport error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(FailureKind::from_status(401), FailureKind::Authentication);
        assert_eq!(FailureKind::from_status(403), FailureKind::Authentication);
        assert_eq!(FailureKind::from_status(429), FailureKind::RateLimit);
        assert_eq!(FailureKind::from_status(500), FailureKind::ServerError);
        assert_eq!(FailureKind::from_status(503), FailureKind::ServerError);
        assert_eq!(FailureKind::from_status(404), FailureKind::Unknown);
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::timeout("request timed out after 30s");
        assert_eq!(err.to_string(), "timeout error: request timed out after 30s");
    }
}
