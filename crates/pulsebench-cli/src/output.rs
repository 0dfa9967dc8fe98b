// Output formatting for CLI

use serde::Serialize;

use pulsebench_core::BenchmarkResult;

const RULE: &str = "--------------------------------------------------";

#[derive(Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }

    pub fn print_value<T: Serialize>(&self, value: &T) {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value).unwrap());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(value).unwrap());
            }
            OutputFormat::Text => {
                // Text format is handled by display_results
            }
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// Print the benchmark results in human-readable form.
pub fn display_results(result: &BenchmarkResult) {
    let stats = &result.statistics;
    let total = stats.successes + stats.failures;

    println!("{}", RULE);
    println!("Completed {}/{} requests successfully", stats.successes, total);

    let Some(summary) = &stats.summary else {
        println!("\nNo successful requests were made. Cannot generate statistics.");
        return;
    };

    println!("\nBenchmark Results:");
    println!("{}", RULE);
    println!("Total requests: {}", stats.successes);
    println!("Min latency: {:.4}s", summary.min);
    println!("Max latency: {:.4}s", summary.max);
    println!("Mean latency: {:.4}s", summary.mean);
    println!("Median latency: {:.4}s", summary.median);
    println!("Standard deviation: {:.4}s", summary.stdev);
    println!("90th percentile: {:.4}s", summary.p90);
    println!("95th percentile: {:.4}s", summary.p95);
    println!("99th percentile: {:.4}s", summary.p99);
    println!("\nLatency Distribution:");
    println!("{}", RULE);
    println!("{}", result.histogram.render());
}
