//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Knowledge base configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Agent configuration
    #[serde(default)]
    pub agent: AgentSettings,

    /// Audio rendering configuration
    #[serde(default)]
    pub audio: AudioConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.knowledge.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "knowledge.top_k".to_string(),
                message: "top_k must be at least 1".to_string(),
            });
        }

        if self.agent.max_history_turns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_history_turns".to_string(),
                message: "history window must hold at least one turn pair".to_string(),
            });
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_seconds".to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        if self.knowledge.chroma_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "knowledge.chroma_url".to_string(),
                message: "vector store URL must not be empty".to_string(),
            });
        }

        if self.audio.enabled && self.audio.output_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "audio.output_dir".to_string(),
                message: "output directory must be set when audio is enabled".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            // Empty by default, must be configured explicitly for production
            cors_origins: Vec::new(),
        }
    }
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Base URL of the Chroma HTTP endpoint
    #[serde(default = "default_chroma_url")]
    pub chroma_url: String,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// FAQ file loaded at startup
    #[serde(default = "default_faq_path")]
    pub faq_path: String,

    /// Number of documents retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_chroma_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_collection() -> String {
    "knowledge_base".to_string()
}
fn default_faq_path() -> String {
    "data/faqs.json".to_string()
}
fn default_top_k() -> usize {
    3
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            chroma_url: default_chroma_url(),
            collection: default_collection(),
            faq_path: default_faq_path(),
            top_k: default_top_k(),
        }
    }
}

/// LLM client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Chat completion model
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (set via SUPPORT_AGENT__LLM__API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_seconds: default_llm_timeout(),
        }
    }
}

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Maximum retained history turn pairs
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// System instruction prepended to every prompt
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    /// Directory for exported transcripts
    #[serde(default = "default_transcript_dir")]
    pub transcript_dir: String,
}

fn default_max_history_turns() -> usize {
    10
}

fn default_system_instruction() -> String {
    "You are a helpful and friendly customer service chatbot. \n\
Your role is to assist users by answering their questions accurately and professionally.\n\
\n\
Guidelines:\n\
1. Use the provided knowledge base context to answer questions when available\n\
2. If the context doesn't contain relevant information, politely say so and offer to help with something else\n\
3. Be concise but thorough in your responses\n\
4. Maintain a friendly and professional tone\n\
5. If asked about topics outside the knowledge base, be honest about your limitations\n\
6. Always prioritize accuracy over speculation\n\
\n\
Remember: You have access to a knowledge base about business hours, account management, billing, security, technical support, and various services."
        .to_string()
}

fn default_transcript_dir() -> String {
    "conversation_logs".to_string()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            system_instruction: default_system_instruction(),
            transcript_dir: default_transcript_dir(),
        }
    }
}

/// Audio rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Enable audio rendering
    #[serde(default)]
    pub enabled: bool,

    /// Synthesis endpoint URL
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    /// Directory for rendered WAV files
    #[serde(default = "default_audio_output_dir")]
    pub output_dir: String,

    /// Request timeout in seconds
    #[serde(default = "default_audio_timeout")]
    pub timeout_seconds: u64,
}

fn default_synthesis_endpoint() -> String {
    "http://localhost:5002/synthesize".to_string()
}
fn default_audio_output_dir() -> String {
    "audio_responses".to_string()
}
fn default_audio_timeout() -> u64 {
    30
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_synthesis_endpoint(),
            output_dir: default_audio_output_dir(),
            timeout_seconds: default_audio_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (SUPPORT_AGENT_ prefix)
/// 2. config/{env} (if env specified)
/// 3. config/default
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SUPPORT_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.knowledge.top_k, 3);
        assert_eq!(settings.agent.max_history_turns, 10);
        assert_eq!(settings.llm.model, "gpt-3.5-turbo");
        assert!(!settings.audio.enabled);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.knowledge.top_k = 0;
        assert!(settings.validate().is_err());

        settings.knowledge.top_k = 3;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_audio_output_dir_required_when_enabled() {
        let mut settings = Settings::default();
        settings.audio.enabled = true;
        settings.audio.output_dir = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_system_instruction_default_mentions_knowledge_base() {
        let settings = Settings::default();
        assert!(settings.agent.system_instruction.contains("knowledge base"));
    }
}
