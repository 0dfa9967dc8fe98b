// Benchmark HTTP route
//
// POST /v1/benchmark runs one full benchmark against the endpoint named in
// the request body and returns the statistics plus the rendered histogram.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use pulsebench_core::{BenchmarkConfig, BenchmarkError, BenchmarkRunner, LatencyStatistics};
use pulsebench_openai::OpenAiChatTransport;

/// Upper bound on requests per REST-triggered run; larger benchmarks
/// belong on the CLI where the caller owns the process lifetime.
const MAX_NUM_REQUESTS: usize = 1000;

fn default_num_requests() -> usize {
    pulsebench_core::config::DEFAULT_NUM_REQUESTS
}

/// Body of POST /v1/benchmark.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BenchmarkRequest {
    /// Base URL of the OpenAI-compatible endpoint to benchmark
    #[schema(example = "https://api.openai.com")]
    pub endpoint: String,

    /// API key for the target endpoint
    pub api_key: String,

    /// Model identifier
    #[schema(example = "gpt-4o")]
    pub model: String,

    /// Prompt sent with every request
    #[schema(example = "Tell me a short joke")]
    pub prompt: String,

    /// Number of requests to send (1-1000)
    #[serde(default = "default_num_requests")]
    #[schema(default = 10, minimum = 1, maximum = 1000)]
    pub num_requests: usize,
}

/// Query-string tuning knobs, all optional.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BenchmarkTuning {
    /// Per-attempt timeout in seconds (default 30)
    pub timeout_secs: Option<f64>,
    /// Maximum retries per request (default 3)
    pub max_retries: Option<u32>,
    /// Base retry delay in seconds (default 1)
    pub retry_delay_secs: Option<f64>,
    /// Pacing delay between requests in seconds (default 2)
    pub request_delay_secs: Option<f64>,
    /// Append a random suffix to every prompt (default false)
    pub randomize_prompt: Option<bool>,
}

/// Response of POST /v1/benchmark.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkResponse {
    /// Latency statistics over the successful requests
    pub stats: LatencyStatistics,

    /// ASCII histogram of the latency distribution, one bucket per line
    #[schema(example = "0.4000 - 0.5000 | ######## (2)")]
    pub histogram: String,
}

/// Error body, matching the `detail` convention of the other endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn unprocessable(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn internal(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Convert an optional seconds value into a Duration, rejecting negative
/// and non-finite input before it can reach the engine.
fn duration_from_secs(name: &str, value: Option<f64>, default: Duration) -> Result<Duration, ApiError> {
    match value {
        None => Ok(default),
        Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(Duration::from_secs_f64(secs)),
        Some(_) => Err(unprocessable(format!("{} must be a non-negative number", name))),
    }
}

pub(crate) fn build_config(
    request: &BenchmarkRequest,
    tuning: &BenchmarkTuning,
) -> Result<BenchmarkConfig, ApiError> {
    if request.num_requests < 1 || request.num_requests > MAX_NUM_REQUESTS {
        return Err(unprocessable(format!(
            "num_requests must be between 1 and {}",
            MAX_NUM_REQUESTS
        )));
    }

    let mut config = BenchmarkConfig::new(&request.endpoint, &request.api_key)
        .with_model(&request.model)
        .with_prompt(&request.prompt)
        .with_num_requests(request.num_requests)
        .with_timeout(duration_from_secs(
            "timeout_secs",
            tuning.timeout_secs,
            pulsebench_core::config::DEFAULT_TIMEOUT,
        )?)
        .with_retry_delay(duration_from_secs(
            "retry_delay_secs",
            tuning.retry_delay_secs,
            pulsebench_core::config::DEFAULT_RETRY_DELAY,
        )?)
        .with_request_delay(duration_from_secs(
            "request_delay_secs",
            tuning.request_delay_secs,
            pulsebench_core::config::DEFAULT_REQUEST_DELAY,
        )?);
    if let Some(max_retries) = tuning.max_retries {
        config = config.with_max_retries(max_retries);
    }
    config.randomize_prompt = tuning.randomize_prompt.unwrap_or(false);

    Ok(config)
}

/// POST /v1/benchmark - Run a benchmark against a model endpoint
#[utoipa::path(
    post,
    path = "/v1/benchmark",
    request_body = BenchmarkRequest,
    params(BenchmarkTuning),
    responses(
        (status = 200, description = "Benchmark statistics and ASCII histogram", body = BenchmarkResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = [])),
    tag = "benchmark"
)]
pub async fn run_benchmark(
    Query(tuning): Query<BenchmarkTuning>,
    Json(request): Json<BenchmarkRequest>,
) -> Result<Json<BenchmarkResponse>, ApiError> {
    let config = build_config(&request, &tuning)?;

    let transport = OpenAiChatTransport::from_config(&config).map_err(|e| {
        tracing::error!("Failed to construct transport: {}", e);
        internal("failed to construct transport")
    })?;

    let runner = BenchmarkRunner::new(Arc::new(transport));
    let result = runner.run(&config).await.map_err(|e| match e {
        BenchmarkError::Configuration(detail) => unprocessable(detail),
        other => {
            tracing::error!("Benchmark failed: {}", other);
            internal("benchmark failed")
        }
    })?;

    Ok(Json(BenchmarkResponse {
        stats: result.statistics,
        histogram: result.histogram.render(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(num_requests: usize) -> BenchmarkRequest {
        BenchmarkRequest {
            endpoint: "https://api.example.com".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o".to_string(),
            prompt: "hi".to_string(),
            num_requests,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&request(10), &BenchmarkTuning::default()).unwrap();
        assert_eq!(config.num_requests, 10);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(!config.randomize_prompt);
    }

    #[test]
    fn test_build_config_bounds() {
        assert!(build_config(&request(0), &BenchmarkTuning::default()).is_err());
        assert!(build_config(&request(1001), &BenchmarkTuning::default()).is_err());
        assert!(build_config(&request(1000), &BenchmarkTuning::default()).is_ok());
    }

    #[test]
    fn test_build_config_rejects_negative_durations() {
        let tuning = BenchmarkTuning {
            timeout_secs: Some(-1.0),
            ..Default::default()
        };
        let err = build_config(&request(10), &tuning).unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_build_config_applies_tuning() {
        let tuning = BenchmarkTuning {
            timeout_secs: Some(2.5),
            max_retries: Some(0),
            retry_delay_secs: Some(0.5),
            request_delay_secs: Some(0.0),
            randomize_prompt: Some(true),
        };
        let config = build_config(&request(10), &tuning).unwrap();
        assert_eq!(config.timeout, Duration::from_secs_f64(2.5));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_delay, Duration::from_secs_f64(0.5));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert!(config.randomize_prompt);
    }
}
