//! LLM client for companion replies
//!
//! Talks to any OpenAI-compatible `/v1/chat/completions` endpoint.

mod ai_types;
mod client;
mod error;
#[cfg(test)]
mod retry_tests;

use async_trait::async_trait;
use companion_chat_core::PromptMessage;

pub use ai_types::ChatRequest;
pub use client::{DEFAULT_MODEL, LlmClient};
pub use error::LlmError;

/// Generates the companion's reply for an assembled prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the trimmed text of the first choice, or an empty string when
    /// the model produced no content.
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, LlmError>;
}
