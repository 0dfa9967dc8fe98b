// Pulsebench CLI
//
// Design Decision: Flat argument surface (one benchmark per invocation),
// with environment defaults loaded from .env for the endpoint, key, and
// model so repeated runs need no flags.

mod output;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulsebench_core::{BenchmarkConfig, BenchmarkRunner, TransportOptions};
use pulsebench_openai::OpenAiChatTransport;

#[derive(Parser)]
#[command(name = "pulsebench")]
#[command(about = "Benchmark an LLM API for latency performance")]
#[command(version)]
pub struct Cli {
    /// API endpoint URL
    #[arg(long, env = "DEFAULT_ENDPOINT", default_value = "https://api.openai.com")]
    pub endpoint: String,

    /// API key for authentication
    #[arg(long, env = "DEFAULT_API_KEY", hide_env_values = true, default_value = "sk-xxx")]
    pub api_key: String,

    /// Model to use
    #[arg(long, env = "DEFAULT_MODEL", default_value = "gpt-4o")]
    pub model: String,

    /// Prompt to send
    #[arg(long, default_value = "Tell me a short joke")]
    pub prompt: String,

    /// Number of requests to make
    #[arg(long, default_value_t = 10)]
    pub num_requests: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30.0)]
    pub timeout: f64,

    /// Maximum number of retries for failed requests
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Base delay between retries in seconds
    #[arg(long, default_value_t = 1.0)]
    pub retry_delay: f64,

    /// Delay between requests in seconds to avoid rate limiting
    #[arg(long, default_value_t = 2.0)]
    pub request_delay: f64,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub no_verify_tls: bool,

    /// Use HTTP instead of HTTPS for the endpoint
    #[arg(long)]
    pub force_http: bool,

    /// Append a random suffix to every prompt to defeat response caches
    #[arg(long)]
    pub randomize_prompt: bool,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress progress logging
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<BenchmarkConfig> {
        for (name, value) in [
            ("--timeout", self.timeout),
            ("--retry-delay", self.retry_delay),
            ("--request-delay", self.request_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number of seconds", name);
            }
        }

        let mut config = BenchmarkConfig::new(&self.endpoint, &self.api_key)
            .with_model(&self.model)
            .with_prompt(&self.prompt)
            .with_num_requests(self.num_requests)
            .with_timeout(Duration::from_secs_f64(self.timeout))
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_secs_f64(self.retry_delay))
            .with_request_delay(Duration::from_secs_f64(self.request_delay));
        config.randomize_prompt = self.randomize_prompt;
        config.transport = TransportOptions {
            verify_tls: !self.no_verify_tls,
            force_http: self.force_http,
        };
        Ok(config)
    }

    fn log_filter(&self) -> &'static str {
        if self.verbose {
            "pulsebench_core=debug,pulsebench_openai=debug,pulsebench_cli=debug"
        } else if self.quiet {
            "pulsebench_core=warn"
        } else {
            "pulsebench_core=info"
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = cli.to_config()?;
    let format = output::OutputFormat::from_str(&cli.output);

    let transport =
        OpenAiChatTransport::from_config(&config).context("failed to set up transport")?;
    let runner = BenchmarkRunner::new(Arc::new(transport));

    let result = runner.run(&config).await?;

    if format.is_text() {
        output::display_results(&result);
    } else {
        format.print_value(&result);
    }

    Ok(())
}
