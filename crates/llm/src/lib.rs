//! Generative model surface for the support agent
//!
//! Features:
//! - Prompt assembly with grounding context and bounded history
//! - `ChatModel` collaborator trait
//! - OpenAI-compatible HTTP client with fixed sampling parameters

pub mod client;
pub mod prompt;

pub use client::{ChatModel, OpenAiChat, OpenAiConfig, SamplingParams};
pub use prompt::{Message, PromptBuilder, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Request error: {0}")]
    Request(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<LlmError> for support_agent_core::Error {
    fn from(err: LlmError) -> Self {
        support_agent_core::Error::Llm(err.to_string())
    }
}
