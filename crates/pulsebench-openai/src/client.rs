// OpenAI-compatible chat-completion client
//
// One client per benchmark run: the endpoint, credential, and TLS options
// come from the run's config and never change mid-run.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use pulsebench_core::{
    BenchmarkConfig, ChatRequest, ChatTransport, TransportError, TransportOptions,
    TransportResponse,
};

use crate::types::ChatCompletionRequest;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// ChatTransport over an OpenAI-compatible HTTP endpoint.
pub struct OpenAiChatTransport {
    client: Client,
    url: String,
    api_key: String,
}

impl OpenAiChatTransport {
    /// Create a transport for the given endpoint and credential.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        options: &TransportOptions,
    ) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!options.verify_tls)
            .build()
            .context("failed to construct HTTP client")?;

        Ok(Self {
            client,
            url: join_url(&endpoint.into(), options),
            api_key: api_key.into(),
        })
    }

    /// Create a transport from a benchmark config.
    pub fn from_config(config: &BenchmarkConfig) -> Result<Self> {
        Self::new(&config.endpoint, &config.api_key, &config.transport)
    }

    /// Full URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Join the endpoint base with the chat-completions path, applying the
/// scheme override.
fn join_url(endpoint: &str, options: &TransportOptions) -> String {
    let mut base = endpoint.trim_end_matches('/').to_string();
    if options.force_http {
        if let Some(rest) = base.strip_prefix("https://") {
            base = format!("http://{}", rest);
        }
    }
    format!("{}{}", base, CHAT_COMPLETIONS_PATH)
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::connection(err.to_string())
    } else {
        TransportError::unknown(err.to_string())
    }
}

#[async_trait]
impl ChatTransport for OpenAiChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        let payload = ChatCompletionRequest::single_prompt(&request.model, &request.prompt);

        tracing::debug!(url = %self.url, model = %request.model, "sending chat completion");

        let start = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .timeout(request.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        // Latency covers the full exchange, including the body
        let body = response.text().await.map_err(map_reqwest_error)?;
        let elapsed = start.elapsed();

        Ok(TransportResponse {
            status,
            body,
            elapsed,
        })
    }
}
