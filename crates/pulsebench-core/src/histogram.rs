// ASCII histogram of successful latencies
//
// Fixed-width buckets over [min, max], bar lengths scaled to the largest
// bucket. The rendered form matches what the CLI prints and what the REST
// front-end returns in its `histogram` field.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of buckets used by both front-ends.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Width in characters of the longest rendered bar.
const BAR_WIDTH: usize = 40;

/// One fixed-width bin `[lower, upper)`; the last bin also absorbs the
/// boundary value equal to the maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistogramBucket {
    /// Lower bound in seconds (inclusive)
    pub lower: f64,
    /// Upper bound in seconds (exclusive, except for the last bucket)
    pub upper: f64,
    /// Number of latencies that fell into this bucket
    pub count: usize,
    /// Rendered bar length, proportional to count / max_count
    pub bar: usize,
}

/// Bucketed latency distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistogramBuckets {
    pub buckets: Vec<HistogramBucket>,
}

impl HistogramBuckets {
    /// Bucket the given latencies into `bucket_count` fixed-width bins.
    ///
    /// When every latency is identical a single bucket holds all values.
    /// An empty input produces no buckets; `render` turns that into an
    /// explicit "no data" indicator.
    pub fn from_latencies(latencies: &[Duration], bucket_count: usize) -> Self {
        let values: Vec<f64> = latencies.iter().map(|d| d.as_secs_f64()).collect();
        if values.is_empty() || bucket_count == 0 {
            return Self { buckets: vec![] };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Self {
                buckets: vec![HistogramBucket {
                    lower: min,
                    upper: max,
                    count: values.len(),
                    bar: BAR_WIDTH,
                }],
            };
        }

        let width = (max - min) / bucket_count as f64;
        let mut counts = vec![0usize; bucket_count];
        for value in &values {
            // The value equal to max lands one past the end; clamp it into
            // the last bucket.
            let index = (((value - min) / width) as usize).min(bucket_count - 1);
            counts[index] += 1;
        }

        let max_count = counts.iter().copied().max().unwrap_or(0);
        let buckets = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let lower = min + i as f64 * width;
                HistogramBucket {
                    lower,
                    upper: lower + width,
                    count,
                    bar: scale_bar(count, max_count),
                }
            })
            .collect();

        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Render the textual chart, one line per bucket:
    /// `{lower} - {upper} | ######## ({count})`.
    pub fn render(&self) -> String {
        if self.buckets.is_empty() {
            return "No data to display".to_string();
        }

        let mut out = String::new();
        for (i, bucket) in self.buckets.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(
                out,
                "{:.4} - {:.4} | {} ({})",
                bucket.lower,
                bucket.upper,
                "#".repeat(bucket.bar),
                bucket.count
            );
        }
        out
    }
}

fn scale_bar(count: usize, max_count: usize) -> usize {
    if max_count == 0 {
        return 0;
    }
    (count as f64 / max_count as f64 * BAR_WIDTH as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(secs: &[f64]) -> Vec<Duration> {
        secs.iter().copied().map(Duration::from_secs_f64).collect()
    }

    #[test]
    fn test_empty_renders_no_data() {
        let histogram = HistogramBuckets::from_latencies(&[], DEFAULT_BUCKET_COUNT);
        assert!(histogram.is_empty());
        assert_eq!(histogram.render(), "No data to display");
    }

    #[test]
    fn test_identical_latencies_single_bucket() {
        let histogram =
            HistogramBuckets::from_latencies(&durations(&[1.0; 5]), DEFAULT_BUCKET_COUNT);
        assert_eq!(histogram.buckets.len(), 1);
        assert_eq!(histogram.buckets[0].count, 5);
        assert_eq!(histogram.buckets[0].lower, histogram.buckets[0].upper);
    }

    #[test]
    fn test_bucket_count_and_totals() {
        let values: Vec<f64> = (0..100).map(|i| 0.1 + i as f64 * 0.01).collect();
        let histogram = HistogramBuckets::from_latencies(&durations(&values), 10);
        assert_eq!(histogram.buckets.len(), 10);
        let total: usize = histogram.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_max_value_clamped_into_last_bucket() {
        let histogram = HistogramBuckets::from_latencies(&durations(&[0.0, 1.0]), 10);
        assert_eq!(histogram.buckets.len(), 10);
        assert_eq!(histogram.buckets[0].count, 1);
        assert_eq!(histogram.buckets[9].count, 1);
    }

    #[test]
    fn test_bar_scaled_to_largest_bucket() {
        // 3 values in the first bucket, 1 in the last
        let histogram = HistogramBuckets::from_latencies(&durations(&[0.0, 0.01, 0.02, 1.0]), 10);
        let max_bar = histogram.buckets.iter().map(|b| b.bar).max().unwrap();
        assert_eq!(max_bar, 40);
        let last = histogram.buckets.last().unwrap();
        assert_eq!(last.count, 1);
        assert_eq!(last.bar, (1.0f64 / 3.0 * 40.0).round() as usize);
    }

    #[test]
    fn test_render_includes_counts() {
        let histogram = HistogramBuckets::from_latencies(&durations(&[1.0; 3]), 10);
        let text = histogram.render();
        assert!(text.contains("(3)"));
        assert!(text.contains('#'));
    }
}
