//! WAV rendering of synthesized speech
//!
//! Turns agent reply text into 16-bit mono WAV artifacts under a
//! configured output directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use sha2::{Digest, Sha256};

use crate::synth::SpeechSynthesizer;
use crate::TtsError;

/// Texts longer than this are truncated before synthesis
const MAX_TEXT_CHARS: usize = 500;

/// Peak amplitude after normalization
const PEAK_TARGET: f32 = 0.95;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("audio_responses"),
        }
    }
}

/// One rendered audio artifact
#[derive(Debug, Clone)]
pub struct RenderedAudio {
    pub path: PathBuf,
    pub sample_rate: u32,
    /// Hex sha256 of the source text, before truncation
    pub text_digest: String,
}

/// Renders reply text to WAV files.
///
/// Rendering is best-effort: any failure is logged and reported as
/// `None` so a missing artifact never fails the chat exchange.
pub struct AudioRenderer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    output_dir: PathBuf,
}

impl AudioRenderer {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: RenderConfig) -> Self {
        Self {
            synthesizer,
            output_dir: config.output_dir,
        }
    }

    /// Render `text` to a WAV file, `response_{timestamp}.wav` by default
    pub async fn render(&self, text: &str, name: Option<&str>) -> Option<RenderedAudio> {
        match self.try_render(text, name).await {
            Ok(rendered) => {
                tracing::info!(path = %rendered.path.display(), "Audio rendered");
                Some(rendered)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Audio rendering failed");
                None
            }
        }
    }

    /// Render several texts, skipping failures
    pub async fn batch_render(&self, texts: &[String], prefix: &str) -> Vec<RenderedAudio> {
        let mut rendered = Vec::new();
        for (index, text) in texts.iter().enumerate() {
            let name = format!("{}_{}.wav", prefix, index + 1);
            if let Some(audio) = self.render(text, Some(&name)).await {
                rendered.push(audio);
            }
        }
        tracing::info!(requested = texts.len(), rendered = rendered.len(), "Batch render complete");
        rendered
    }

    /// Delete `.wav` artifacts older than `days`, returning how many
    pub fn purge_older_than(&self, days: u64) -> usize {
        let threshold = Duration::from_secs(days * 24 * 60 * 60);
        let entries = match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, dir = %self.output_dir.display(), "Purge skipped");
                return 0;
            }
        };

        let mut deleted = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("wav") {
                continue;
            }
            let Ok(age) = entry.metadata().and_then(|meta| meta.modified()).map(|mtime| {
                mtime.elapsed().unwrap_or_default()
            }) else {
                continue;
            };
            if age > threshold && std::fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }

        if deleted > 0 {
            tracing::info!(deleted, days, "Purged old audio artifacts");
        }
        deleted
    }

    async fn try_render(&self, text: &str, name: Option<&str>) -> Result<RenderedAudio, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
        let text = truncate(text);

        let samples = self.synthesizer.synthesize(&text).await?;
        if samples.is_empty() {
            return Err(TtsError::Synthesis("no samples produced".to_string()));
        }
        let samples = normalize(samples);

        let filename = match name {
            Some(name) if name.ends_with(".wav") => name.to_string(),
            Some(name) => format!("{name}.wav"),
            None => format!("response_{}.wav", Local::now().format("%Y%m%d_%H%M%S")),
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename);
        let sample_rate = self.synthesizer.sample_rate();
        write_wav(&path, &samples, sample_rate)?;

        Ok(RenderedAudio {
            path,
            sample_rate,
            text_digest: digest,
        })
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        tracing::warn!(limit = MAX_TEXT_CHARS, "Text too long for synthesis, truncating");
        let mut out: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

fn normalize(mut samples: Vec<f32>) -> Vec<f32> {
    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        let scale = PEAK_TARGET / peak;
        for sample in &mut samples {
            *sample *= scale;
        }
    }
    samples
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), TtsError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|err| TtsError::Encode(err.to_string()))?;
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|err| TtsError::Encode(err.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|err| TtsError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubSynth {
        samples: Vec<f32>,
        fail_on: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    impl StubSynth {
        fn with_samples(samples: Vec<f32>) -> Self {
            Self {
                samples,
                fail_on: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for StubSynth {
        async fn synthesize(&self, text: &str) -> Result<Vec<f32>, TtsError> {
            self.seen.lock().unwrap().push(text.to_string());
            if let Some(trigger) = &self.fail_on {
                if text.contains(trigger.as_str()) {
                    return Err(TtsError::Synthesis("stub failure".to_string()));
                }
            }
            Ok(self.samples.clone())
        }

        fn sample_rate(&self) -> u32 {
            16_000
        }
    }

    fn renderer(synth: Arc<StubSynth>, dir: &Path) -> AudioRenderer {
        AudioRenderer::new(
            synth,
            RenderConfig {
                output_dir: dir.to_path_buf(),
            },
        )
    }

    #[tokio::test]
    async fn test_render_writes_wav() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.1, -0.3, 0.5]));
        let renderer = renderer(synth, dir.path());

        let audio = renderer.render("Hello there", Some("greeting")).await.unwrap();
        assert!(audio.path.exists());
        assert_eq!(audio.path.file_name().unwrap(), "greeting.wav");
        assert_eq!(audio.sample_rate, 16_000);
    }

    #[tokio::test]
    async fn test_default_name_has_timestamp_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.2]));
        let renderer = renderer(synth, dir.path());

        let audio = renderer.render("Hi", None).await.unwrap();
        let name = audio.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("response_"));
        assert!(name.ends_with(".wav"));
    }

    #[tokio::test]
    async fn test_long_text_truncated_before_synthesis() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.2]));
        let renderer = renderer(synth.clone(), dir.path());

        let long_text = "a".repeat(600);
        renderer.render(&long_text, Some("long")).await.unwrap();

        let seen = synth.seen.lock().unwrap();
        assert_eq!(seen[0].chars().count(), 500);
        assert!(seen[0].ends_with("..."));
    }

    #[tokio::test]
    async fn test_digest_covers_untruncated_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.2]));
        let renderer = renderer(synth, dir.path());

        let audio = renderer.render("hello", Some("digest")).await.unwrap();
        assert_eq!(
            audio.text_digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn test_normalization_scales_to_peak() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.5, -0.25]));
        let renderer = renderer(synth, dir.path());

        let audio = renderer.render("Hi", Some("norm")).await.unwrap();

        let mut reader = hound::WavReader::open(&audio.path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();

        let expected = (0.95 * i16::MAX as f32) as u16;
        assert!(peak.abs_diff(expected) <= 1);
    }

    #[tokio::test]
    async fn test_failure_returns_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth {
            samples: vec![0.2],
            fail_on: Some("boom".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let renderer = renderer(synth, dir.path());

        assert!(renderer.render("boom", None).await.is_none());
        assert!(renderer.render("", None).await.is_none());
    }

    #[tokio::test]
    async fn test_batch_render_continues_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth {
            samples: vec![0.2],
            fail_on: Some("bad".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let renderer = renderer(synth, dir.path());

        let texts = vec!["ok one".to_string(), "bad apple".to_string(), "ok two".to_string()];
        let rendered = renderer.batch_render(&texts, "batch").await;

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].path.file_name().unwrap(), "batch_1.wav");
        assert_eq!(rendered[1].path.file_name().unwrap(), "batch_3.wav");
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = Arc::new(StubSynth::with_samples(vec![0.2]));
        let renderer = renderer(synth, dir.path());

        renderer.render("Hi", Some("fresh")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        // Nothing is a day old yet.
        assert_eq!(renderer.purge_older_than(1), 0);

        // With a zero-day threshold every artifact qualifies.
        assert_eq!(renderer.purge_older_than(0), 1);
        assert!(dir.path().join("notes.txt").exists());
        assert!(!dir.path().join("fresh.wav").exists());
    }
}
