//! Support Agent Server Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use support_agent_agent::{AgentConfig, ChatAgent};
use support_agent_config::{load_settings, Settings};
use support_agent_llm::{OpenAiChat, OpenAiConfig};
use support_agent_rag::{ChromaConfig, ChromaStore, KnowledgeBase};
use support_agent_server::{create_router, AppState};
use support_agent_tts::{AudioRenderer, HttpSynthesizer, HttpSynthesizerConfig, RenderConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_name = std::env::var("SUPPORT_AGENT_ENV").ok();
    let settings = load_settings(env_name.as_deref())?;

    init_tracing(&settings);
    tracing::info!("Starting Support Agent Server v{}", env!("CARGO_PKG_VERSION"));

    let knowledge = Arc::new(connect_knowledge(&settings).await?);
    bootstrap_faqs(&knowledge, &settings).await;

    let api_key = settings
        .llm
        .api_key
        .clone()
        .ok_or("llm.api_key must be set (SUPPORT_AGENT__LLM__API_KEY)")?;
    let model = Arc::new(OpenAiChat::new(OpenAiConfig {
        api_base: settings.llm.api_base.clone(),
        api_key,
        model: settings.llm.model.clone(),
        timeout_seconds: settings.llm.timeout_seconds,
    })?);
    tracing::info!(model = %settings.llm.model, "Chat model ready");

    let agent = Arc::new(ChatAgent::new(
        knowledge.clone(),
        model,
        AgentConfig {
            max_history_turns: settings.agent.max_history_turns,
            top_k: settings.knowledge.top_k,
            system_instruction: settings.agent.system_instruction.clone(),
        },
    ));

    let audio = build_audio_renderer(&settings)?;

    let state = AppState::new(settings.clone(), agent, knowledge, audio);
    let app = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn connect_knowledge(settings: &Settings) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    let store = ChromaStore::connect(ChromaConfig {
        base_url: settings.knowledge.chroma_url.clone(),
        collection: settings.knowledge.collection.clone(),
        timeout_seconds: 30,
    })
    .await?;
    tracing::info!(url = %settings.knowledge.chroma_url, collection = %settings.knowledge.collection, "Knowledge store connected");
    Ok(KnowledgeBase::new(Arc::new(store)))
}

/// Seed the knowledge base from the FAQ file when the collection is empty.
///
/// Bootstrap failures degrade to warnings; searches against an empty
/// collection simply return no context.
async fn bootstrap_faqs(knowledge: &KnowledgeBase, settings: &Settings) {
    let populated = match knowledge.stats().await {
        Ok(stats) if stats.total_documents > 0 => {
            tracing::info!(documents = stats.total_documents, "Knowledge base already populated, skipping FAQ load");
            true
        }
        Ok(_) => false,
        Err(err) => {
            tracing::warn!(error = %err, "Could not inspect knowledge base, skipping FAQ load");
            true
        }
    };
    if populated {
        return;
    }

    let path = std::path::Path::new(&settings.knowledge.faq_path);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "FAQ file not found, starting with an empty knowledge base");
        return;
    }

    match knowledge.load_faqs_from_file(path, false).await {
        Ok(count) => tracing::info!(count, "FAQs loaded"),
        Err(err) => tracing::warn!(error = %err, "FAQ load failed"),
    }
}

fn build_audio_renderer(settings: &Settings) -> Result<Option<Arc<AudioRenderer>>, Box<dyn std::error::Error>> {
    if !settings.audio.enabled {
        return Ok(None);
    }

    let synthesizer = Arc::new(HttpSynthesizer::new(HttpSynthesizerConfig {
        endpoint: settings.audio.endpoint.clone(),
        timeout_seconds: settings.audio.timeout_seconds,
        ..HttpSynthesizerConfig::default()
    })?);
    let renderer = AudioRenderer::new(
        synthesizer,
        RenderConfig {
            output_dir: settings.audio.output_dir.clone().into(),
        },
    );
    tracing::info!(endpoint = %settings.audio.endpoint, "Audio rendering enabled");
    Ok(Some(Arc::new(renderer)))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("support_agent={level},tower_http=debug").into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}
