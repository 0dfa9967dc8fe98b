// OpenAI chat-completion request types
//
// Only the request side lives here; response bodies go back to the engine
// as raw text and are interpreted there.

use serde::Serialize;

/// Sampling temperature sent with every benchmark request.
pub const TEMPERATURE: f32 = 0.7;

/// Completion budget sent with every benchmark request. Kept small so the
/// measured latency is dominated by the endpoint, not by token count.
pub const MAX_TOKENS: u32 = 150;

/// OpenAI chat completion request format
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Build the single-user-message request the benchmark sends.
    pub fn single_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
