//! Speech synthesis collaborator

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::TtsError;

/// Speech synthesis backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text into mono PCM samples in `[-1.0, 1.0]`
    async fn synthesize(&self, text: &str) -> Result<Vec<f32>, TtsError>;

    /// Sample rate of the produced audio
    fn sample_rate(&self) -> u32;
}

/// HTTP synthesizer configuration
#[derive(Debug, Clone)]
pub struct HttpSynthesizerConfig {
    pub endpoint: String,
    pub sample_rate: u32,
    pub timeout_seconds: u64,
}

impl Default for HttpSynthesizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5002/synthesize".to_string(),
            sample_rate: 16_000,
            timeout_seconds: 30,
        }
    }
}

/// Synthesizer backed by an HTTP synthesis endpoint.
///
/// The endpoint receives `{ "text": ... }` and answers
/// `{ "samples": [...], "sample_rate": ... }`. A reported sample rate
/// that differs from the configured one is rejected.
pub struct HttpSynthesizer {
    client: Client,
    config: HttpSynthesizerConfig,
}

impl HttpSynthesizer {
    pub fn new(config: HttpSynthesizerConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| TtsError::Request(err.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<f32>, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&SynthesisRequest { text })
            .send()
            .await
            .map_err(|err| TtsError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(TtsError::Synthesis(format!("{status}: {body}")));
        }

        let parsed: SynthesisResponse = response
            .json()
            .await
            .map_err(|err| TtsError::InvalidResponse(err.to_string()))?;

        if parsed.sample_rate != self.config.sample_rate {
            return Err(TtsError::InvalidResponse(format!(
                "endpoint reported sample rate {}, expected {}",
                parsed.sample_rate, self.config.sample_rate
            )));
        }

        Ok(parsed.samples)
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    samples: Vec<f32>,
    sample_rate: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpSynthesizerConfig::default();
        assert_eq!(config.sample_rate, 16_000);
        assert!(config.endpoint.ends_with("/synthesize"));
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_value(SynthesisRequest { text: "hello" }).unwrap();
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn test_response_deserialization() {
        let parsed: SynthesisResponse =
            serde_json::from_str(r#"{"samples": [0.1, -0.2], "sample_rate": 16000}"#).unwrap();
        assert_eq!(parsed.samples.len(), 2);
        assert_eq!(parsed.sample_rate, 16_000);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let synth = HttpSynthesizer::new(HttpSynthesizerConfig::default()).unwrap();
        let result = synth.synthesize("   ").await;
        assert!(matches!(result, Err(TtsError::EmptyText)));
    }
}
