// Descriptive statistics over successful latencies
//
// All values are fractional seconds. Percentiles use linear interpolation
// on the sorted sample, which keeps results deterministic and comparable
// across runs; nearest-rank variants disagree on small samples.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary of one benchmark run's latency distribution.
///
/// `summary` is absent (not zero) when no request succeeded; callers must
/// render that case distinctly from a real zero-latency result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LatencyStatistics {
    /// Number of successful logical requests
    pub successes: usize,

    /// Number of failed logical requests
    pub failures: usize,

    /// Flattened into the object when present; omitted entirely when no
    /// request succeeded
    #[serde(flatten)]
    pub summary: Option<LatencySummary>,
}

/// Derived fields, defined only when at least one request succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LatencySummary {
    /// Minimum latency in seconds
    pub min: f64,
    /// Maximum latency in seconds
    pub max: f64,
    /// Arithmetic mean in seconds
    pub mean: f64,
    /// Median in seconds (average of the central pair for even counts)
    pub median: f64,
    /// Sample standard deviation in seconds (0 for a single sample)
    pub stdev: f64,
    /// 90th percentile in seconds
    pub p90: f64,
    /// 95th percentile in seconds
    pub p95: f64,
    /// 99th percentile in seconds
    pub p99: f64,
}

impl LatencyStatistics {
    /// Reduce the successful latencies of a run.
    ///
    /// Idempotent: the input is copied and sorted locally, so computing
    /// twice on the same slice yields identical output.
    pub fn compute(latencies: &[Duration], failures: usize) -> Self {
        let mut sorted: Vec<f64> = latencies.iter().map(|d| d.as_secs_f64()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let summary = if sorted.is_empty() {
            None
        } else {
            let count = sorted.len();
            let mean = sorted.iter().sum::<f64>() / count as f64;
            Some(LatencySummary {
                min: sorted[0],
                max: sorted[count - 1],
                mean,
                median: median(&sorted),
                stdev: sample_stdev(&sorted, mean),
                p90: percentile(&sorted, 90.0),
                p95: percentile(&sorted, 95.0),
                p99: percentile(&sorted, 99.0),
            })
        };

        Self {
            successes: latencies.len(),
            failures,
            summary,
        }
    }
}

/// Middle value of a sorted sample; average of the two central values for
/// even counts.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample standard deviation (n - 1 divisor). A single sample has no
/// dispersion estimate; report 0 by convention.
fn sample_stdev(sorted: &[f64], mean: f64) -> f64 {
    let n = sorted.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Percentile by linear interpolation on a sorted sample.
///
/// Rank `r = p/100 * (n - 1)`; the result interpolates between the
/// neighboring order statistics. Must not be replaced with a nearest-rank
/// method: downstream consumers compare percentile values across runs.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}
