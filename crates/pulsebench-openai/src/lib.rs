// OpenAI-compatible Transport
//
// This crate owns everything wire-level the benchmark engine is agnostic
// to: endpoint joining, header construction, payload shape, TLS options,
// and the mapping from reqwest failures onto the engine's failure taxonomy.

pub mod client;
pub mod types;

pub use client::OpenAiChatTransport;
pub use types::{ChatCompletionRequest, ChatMessage};
