// Benchmark configuration
//
// Decision: configuration is an explicit immutable value handed to the
// runner, never ambient global state. The API and CLI front-ends build one
// per invocation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BenchmarkError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_PROMPT: &str = "Tell me a short joke";
pub const DEFAULT_NUM_REQUESTS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Pacing delay between logical requests, to stay under provider rate limits.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Configuration for one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BenchmarkConfig {
    /// Base URL of the OpenAI-compatible endpoint (without the /v1/... path)
    pub endpoint: String,

    /// Bearer token sent to the endpoint
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Prompt sent with every request
    pub prompt: String,

    /// Number of logical requests to issue (must be >= 1)
    pub num_requests: usize,

    /// Per-attempt timeout
    #[serde(with = "duration_millis")]
    #[cfg_attr(feature = "openapi", schema(value_type = u64))]
    pub timeout: Duration,

    /// Maximum retries per logical request (0 disables retries)
    pub max_retries: u32,

    /// Base delay for exponential retry backoff
    #[serde(with = "duration_millis")]
    #[cfg_attr(feature = "openapi", schema(value_type = u64))]
    pub retry_delay: Duration,

    /// Pacing delay between successive logical requests
    #[serde(with = "duration_millis")]
    #[cfg_attr(feature = "openapi", schema(value_type = u64))]
    pub request_delay: Duration,

    /// Append a random suffix to the prompt of every logical request,
    /// defeating response caches in front of the endpoint
    #[serde(default)]
    pub randomize_prompt: bool,

    /// Transport-level options
    #[serde(default)]
    pub transport: TransportOptions,
}

impl BenchmarkConfig {
    /// Create a config for the given endpoint and credential, with defaults
    /// for everything else.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            num_requests: DEFAULT_NUM_REQUESTS,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_delay: DEFAULT_REQUEST_DELAY,
            randomize_prompt: false,
            transport: TransportOptions::default(),
        }
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the prompt text
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the number of logical requests
    pub fn with_num_requests(mut self, num_requests: usize) -> Self {
        self.num_requests = num_requests;
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base retry delay
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Set the inter-request pacing delay
    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    /// Validate configuration invariants.
    ///
    /// Called by the runner before the first request; violations abort the
    /// benchmark up front instead of mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(BenchmarkError::config("endpoint must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(BenchmarkError::config("model must not be empty"));
        }
        if self.num_requests < 1 {
            return Err(BenchmarkError::config("num_requests must be at least 1"));
        }
        Ok(())
    }
}

/// Options consumed by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TransportOptions {
    /// Verify TLS certificates (disable for endpoints with self-signed certs)
    pub verify_tls: bool,

    /// Rewrite an https:// endpoint to http:// before sending
    pub force_http: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            verify_tls: true,
            force_http: false,
        }
    }
}

/// Serde support for Duration as milliseconds
pub(crate) mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchmarkConfig::new("https://api.example.com", "sk-test");
        assert_eq!(config.num_requests, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.request_delay, Duration::from_secs(2));
        assert!(config.transport.verify_tls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_requests_rejected() {
        let config = BenchmarkConfig::new("https://api.example.com", "sk-test").with_num_requests(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let config = BenchmarkConfig::new("", "sk-test");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = BenchmarkConfig::new("https://api.example.com", "sk-test")
            .with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: BenchmarkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.timeout, Duration::from_millis(1500));
        assert_eq!(parsed.endpoint, config.endpoint);
    }
}
