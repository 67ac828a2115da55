//! Retrieval-grounded response orchestration
//!
//! `ChatAgent` wires the knowledge base, prompt assembly, and the chat
//! model into a single `respond` entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use support_agent_config::AgentSettings;
use support_agent_llm::{ChatModel, Message, PromptBuilder, SamplingParams};
use support_agent_rag::KnowledgeBase;

use crate::history::{ConversationHistory, TokenEstimate};
use crate::transcript;
use crate::AgentError;

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_history_turns: usize,
    pub top_k: usize,
    pub system_instruction: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let settings = AgentSettings::default();
        Self {
            max_history_turns: settings.max_history_turns,
            top_k: 3,
            system_instruction: settings.system_instruction,
        }
    }
}

/// One agent reply with grounding metadata
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub used_context: bool,
    pub sources_found: usize,
}

const EMPTY_COMPLETION_FALLBACK: &str = "I apologize, but I couldn't generate a response.";

/// Conversational support agent.
///
/// History is appended only for exchanges that produced a model reply
/// (including the empty-completion fallback). Failed exchanges leave the
/// history untouched so a retry sees the same context.
pub struct ChatAgent {
    knowledge: Arc<KnowledgeBase>,
    model: Arc<dyn ChatModel>,
    system_instruction: Mutex<String>,
    history: Mutex<ConversationHistory>,
    sampling: SamplingParams,
    top_k: usize,
    max_history_turns: usize,
}

impl ChatAgent {
    pub fn new(knowledge: Arc<KnowledgeBase>, model: Arc<dyn ChatModel>, config: AgentConfig) -> Self {
        Self {
            knowledge,
            model,
            system_instruction: Mutex::new(config.system_instruction),
            history: Mutex::new(ConversationHistory::new(config.max_history_turns)),
            sampling: SamplingParams::default(),
            top_k: config.top_k,
            max_history_turns: config.max_history_turns,
        }
    }

    /// Produce a reply to `query`, grounding it in the knowledge base
    pub async fn respond(&self, query: &str) -> Result<AgentReply, AgentError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let result = self.knowledge.search(query, self.top_k).await;
        let sources_found = result.len();
        let context = if result.is_empty() {
            String::new()
        } else {
            self.knowledge.format_context(&result)
        };

        let (instruction, history_messages) = {
            let instruction = self.system_instruction.lock().clone();
            let history = self.history.lock();
            let messages: Vec<Message> = history
                .recent(self.max_history_turns)
                .iter()
                .map(|turn| match turn.role {
                    support_agent_core::TurnRole::User => Message::user(&turn.content),
                    support_agent_core::TurnRole::Assistant => Message::assistant(&turn.content),
                })
                .collect();
            (instruction, messages)
        };

        let messages = PromptBuilder::new()
            .system_prompt(&instruction)
            .with_history(&history_messages)
            .with_context(&context)
            .user_message(query)
            .build();

        match self.model.complete(&messages, &self.sampling).await {
            Ok(Some(text)) => {
                self.history.lock().append(query, text.clone());
                tracing::debug!(sources_found, used_context = !context.is_empty(), "Reply generated");
                Ok(AgentReply {
                    text,
                    used_context: !context.is_empty(),
                    sources_found,
                })
            }
            Ok(None) => {
                tracing::warn!("Model returned an empty completion");
                self.history.lock().append(query, EMPTY_COMPLETION_FALLBACK);
                Ok(AgentReply {
                    text: EMPTY_COMPLETION_FALLBACK.to_string(),
                    used_context: !context.is_empty(),
                    sources_found,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Completion failed");
                Ok(AgentReply {
                    text: format!("I apologize, but I encountered an error: {err}"),
                    used_context: false,
                    sources_found,
                })
            }
        }
    }

    /// Replace the system instruction for subsequent replies
    pub fn set_system_instruction(&self, instruction: impl Into<String>) {
        *self.system_instruction.lock() = instruction.into();
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn history_summary(&self) -> String {
        self.history.lock().summary()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    pub fn token_estimate(&self) -> TokenEstimate {
        self.history.lock().token_estimate()
    }

    /// Export the conversation so far to a transcript file under `dir`
    pub fn export_transcript(&self, dir: &Path) -> Result<PathBuf, AgentError> {
        let turns = self.history.lock().turns().to_vec();
        transcript::export(dir, &turns)
    }
}
