//! Conversational agent for the support chat pipeline
//!
//! Features:
//! - Bounded conversation history with pair-wise eviction
//! - Retrieval-grounded response orchestration
//! - Transcript export

pub mod agent;
pub mod history;
pub mod transcript;

pub use agent::{AgentConfig, AgentReply, ChatAgent};
pub use history::{ConversationHistory, TokenEstimate};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("No conversation history to export")]
    EmptyHistory,

    #[error("Knowledge error: {0}")]
    Knowledge(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<support_agent_rag::RagError> for AgentError {
    fn from(err: support_agent_rag::RagError) -> Self {
        AgentError::Knowledge(err.to_string())
    }
}

impl From<support_agent_llm::LlmError> for AgentError {
    fn from(err: support_agent_llm::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}

impl From<AgentError> for support_agent_core::Error {
    fn from(err: AgentError) -> Self {
        support_agent_core::Error::Agent(err.to_string())
    }
}
