//! Configuration management for the support agent
//!
//! Supports loading configuration from:
//! - TOML/YAML files under `config/`
//! - Environment variables (SUPPORT_AGENT_ prefix, `__` separator)

pub mod settings;

pub use settings::{
    load_settings, AgentSettings, AudioConfig, KnowledgeConfig, LlmConfig, ObservabilityConfig,
    ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for support_agent_core::Error {
    fn from(err: ConfigError) -> Self {
        support_agent_core::Error::Config(err.to_string())
    }
}
