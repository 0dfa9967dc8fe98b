// Benchmark result types
//
// A RequestOutcome is the terminal record of one logical request; a
// BenchmarkResult is the ordered sequence of outcomes plus the reductions
// computed once, after the last request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FailureKind;
use crate::histogram::HistogramBuckets;
use crate::stats::LatencyStatistics;

/// Terminal status of a logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

/// Result of one logical request, after all retries.
///
/// Immutable once produced; owned by the result's outcome list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RequestOutcome {
    /// Zero-based sequence index (outcomes are in request-issue order)
    pub index: usize,

    pub status: OutcomeStatus,

    /// Elapsed time of the successful attempt only; retries that failed
    /// before it do not count toward this
    #[serde(
        with = "option_duration_secs",
        skip_serializing_if = "Option::is_none",
        default
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub latency: Option<Duration>,

    /// Number of physical attempts made (1 when the first attempt decided)
    pub attempts: u32,

    /// Terminal failure kind, present iff status is Failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<FailureKind>,
}

impl RequestOutcome {
    pub fn success(index: usize, latency: Duration, attempts: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Success,
            latency: Some(latency),
            attempts,
            failure: None,
        }
    }

    pub fn failed(index: usize, kind: FailureKind, attempts: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Failed,
            latency: None,
            attempts,
            failure: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Everything one benchmark run produced. Read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BenchmarkResult {
    /// Outcomes in strict request-issue order
    pub outcomes: Vec<RequestOutcome>,

    /// Reduction of the successful-latency subset
    pub statistics: LatencyStatistics,

    /// Bucketed view of the successful-latency subset
    pub histogram: HistogramBuckets,
}

impl BenchmarkResult {
    /// Latencies of the successful outcomes, in request order.
    pub fn successful_latencies(&self) -> Vec<Duration> {
        self.outcomes.iter().filter_map(|o| o.latency).collect()
    }
}

/// Serde support for Option<Duration> as fractional seconds
mod option_duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(|d| d.as_secs_f64()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let ok = RequestOutcome::success(0, Duration::from_millis(420), 2);
        assert!(ok.is_success());
        assert_eq!(ok.attempts, 2);
        assert_eq!(ok.failure, None);

        let failed = RequestOutcome::failed(1, FailureKind::Timeout, 4);
        assert!(!failed.is_success());
        assert_eq!(failed.latency, None);
        assert_eq!(failed.failure, Some(FailureKind::Timeout));
    }

    #[test]
    fn test_latency_serializes_as_seconds() {
        let outcome = RequestOutcome::success(0, Duration::from_millis(1500), 1);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["latency"], serde_json::json!(1.5));

        let failed = RequestOutcome::failed(1, FailureKind::Connection, 1);
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json.get("latency").is_none());
    }
}
