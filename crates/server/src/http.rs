//! HTTP Endpoints
//!
//! REST API for the support agent.

use axum::{
    extract::{Json, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use support_agent_agent::AgentError;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/history/clear", post(clear_history))
        .route("/api/history", get(get_history))
        .route("/api/transcript/export", post(export_transcript))
        .route("/api/stats", get(get_stats))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http());

    if state.config.server.cors_enabled {
        router = router.layer(cors_layer(&state.config.server.cors_origins));
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
    #[serde(default)]
    enable_audio: bool,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    response_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_path: Option<String>,
    sources_found: usize,
}

/// Chat endpoint
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    state.stats.record_query();

    let reply = state.agent.respond(&request.text).await.map_err(|err| match err {
        AgentError::EmptyQuery => ServerError::InvalidRequest("Message cannot be empty".to_string()),
        other => ServerError::Internal(other.to_string()),
    })?;

    // A missing artifact never fails the exchange.
    let audio_path = match (&state.audio, request.enable_audio) {
        (Some(renderer), true) => renderer
            .render(&reply.text, None)
            .await
            .map(|audio| audio.path.display().to_string()),
        _ => None,
    };

    Ok(Json(ChatResponse {
        response_text: reply.text,
        audio_path,
        sources_found: reply.sources_found,
    }))
}

/// Clear conversation history
async fn clear_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.agent.clear_history();
    Json(serde_json::json!({ "message": "Conversation history cleared" }))
}

/// Get conversation history
async fn get_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "history": state.agent.history_summary(),
        "turns": state.agent.history_len() / 2,
    }))
}

/// Export the conversation to a transcript file
async fn export_transcript(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let dir = std::path::Path::new(&state.config.agent.transcript_dir);
    let path = state.agent.export_transcript(dir).map_err(|err| match err {
        AgentError::EmptyHistory => {
            ServerError::InvalidRequest("No conversation history to export".to_string())
        }
        other => ServerError::Internal(other.to_string()),
    })?;

    Ok(Json(serde_json::json!({ "path": path.display().to_string() })))
}

/// Get knowledge base and session statistics
async fn get_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ServerError> {
    let kb_stats = state
        .knowledge
        .stats()
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))?;
    let token_estimate = state.agent.token_estimate();

    Ok(Json(serde_json::json!({
        "session": {
            "total_queries": state.stats.total_queries(),
            "duration": state.stats.uptime(),
            "conversation_turns": token_estimate.turns,
            "approx_tokens": token_estimate.approx_tokens,
        },
        "knowledge_base": {
            "total_documents": kb_stats.total_documents,
            "categories": kb_stats.categories,
        },
        "model": {
            "name": state.config.llm.model,
        },
    })))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use support_agent_agent::{AgentConfig, ChatAgent};
    use support_agent_config::Settings;
    use support_agent_llm::{ChatModel, LlmError, Message, SamplingParams};
    use support_agent_rag::{DocumentMeta, KnowledgeBase, RagError, VectorIndex};

    struct EmptyIndex;

    #[async_trait]
    impl VectorIndex for EmptyIndex {
        async fn add(
            &self,
            _ids: Vec<String>,
            _documents: Vec<String>,
            _metadatas: Vec<DocumentMeta>,
        ) -> Result<(), RagError> {
            Ok(())
        }

        async fn query(
            &self,
            _text: &str,
            _top_k: usize,
        ) -> Result<Vec<(String, DocumentMeta, f32)>, RagError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize, RagError> {
            Ok(0)
        }

        async fn all(&self) -> Result<Vec<(String, DocumentMeta)>, RagError> {
            Ok(Vec::new())
        }

        async fn reset(&self) -> Result<(), RagError> {
            Ok(())
        }
    }

    struct SilentModel;

    #[async_trait]
    impl ChatModel for SilentModel {
        async fn complete(
            &self,
            _messages: &[Message],
            _params: &SamplingParams,
        ) -> Result<Option<String>, LlmError> {
            Ok(Some("ok".to_string()))
        }
    }

    #[test]
    fn test_router_creation() {
        let knowledge = Arc::new(KnowledgeBase::new(Arc::new(EmptyIndex)));
        let agent = Arc::new(ChatAgent::new(
            knowledge.clone(),
            Arc::new(SilentModel),
            AgentConfig::default(),
        ));
        let state = AppState::new(Settings::default(), agent, knowledge, None);
        let _ = create_router(state);
    }

    #[test]
    fn test_chat_request_audio_defaults_off() {
        let request: ChatRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert!(!request.enable_audio);
    }

    #[test]
    fn test_chat_response_omits_missing_audio() {
        let json = serde_json::to_value(ChatResponse {
            response_text: "hi".to_string(),
            audio_path: None,
            sources_found: 0,
        })
        .unwrap();
        assert!(json.get("audio_path").is_none());
    }
}
