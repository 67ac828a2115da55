//! Audio rendering for agent replies
//!
//! Features:
//! - `SpeechSynthesizer` collaborator trait with an HTTP implementation
//! - WAV rendering with truncation and peak normalization
//! - Artifact naming, batch rendering, and age-based purging

pub mod render;
pub mod synth;

pub use render::{AudioRenderer, RenderConfig, RenderedAudio};
pub use synth::{HttpSynthesizer, HttpSynthesizerConfig, SpeechSynthesizer};

use thiserror::Error;

/// TTS errors
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TtsError> for support_agent_core::Error {
    fn from(err: TtsError) -> Self {
        support_agent_core::Error::Tts(err.to_string())
    }
}
