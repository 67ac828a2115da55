//! Application State
//!
//! Shared state across all handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use support_agent_agent::ChatAgent;
use support_agent_config::Settings;
use support_agent_rag::KnowledgeBase;
use support_agent_tts::AudioRenderer;

/// Per-process session counters
pub struct SessionStats {
    started_at: DateTime<Utc>,
    total_queries: AtomicU64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_queries: AtomicU64::new(0),
        }
    }

    pub fn record_query(&self) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Uptime as `"{h}h {m}m {s}s"`
    pub fn uptime(&self) -> String {
        let seconds = (Utc::now() - self.started_at).num_seconds().max(0);
        format!("{}h {}m {}s", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub agent: Arc<ChatAgent>,
    pub knowledge: Arc<KnowledgeBase>,
    /// Absent when audio rendering is disabled
    pub audio: Option<Arc<AudioRenderer>>,
    pub stats: Arc<SessionStats>,
}

impl AppState {
    pub fn new(
        config: Settings,
        agent: Arc<ChatAgent>,
        knowledge: Arc<KnowledgeBase>,
        audio: Option<Arc<AudioRenderer>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            agent,
            knowledge,
            audio,
            stats: Arc::new(SessionStats::new()),
        }
    }
}
