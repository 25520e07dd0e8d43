//! Edge TTS gateway provider (tier 2)
//!
//! Talks to a self-hosted gateway in front of the Edge neural voices. No
//! meaningful quota, which is what makes it the always-available middle tier.
//!
//! Emotion control is prosody-based: signed rate and pitch offsets. The
//! offsets are added to the configured baseline so an operator-tuned base
//! speech rate is preserved under every emotion.

use std::time::Duration;

use async_trait::async_trait;
use domain::{AudioFormat, EmotionTag};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::EdgeTtsConfig;
use crate::emotion;
use crate::error::SpeechError;
use crate::ports::SpeechSynthesizer;
use crate::providers::classify_failure;
use crate::types::AudioData;

/// Edge TTS gateway provider
#[derive(Debug, Clone)]
pub struct EdgeTtsProvider {
    client: Client,
    config: EdgeTtsConfig,
}

/// Request body for the gateway's synthesize endpoint
#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice: &'a str,
    rate: String,
    pitch: String,
}

impl EdgeTtsProvider {
    /// Create a new Edge gateway provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: EdgeTtsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/api/synthesize", self.config.base_url)
    }
}

#[async_trait]
impl SpeechSynthesizer for EdgeTtsProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), emotion = %emotion))]
    async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<AudioData, SpeechError> {
        let request = SynthesizeRequest {
            text,
            voice: &self.config.voice,
            rate: emotion::rate_string(self.config.base_rate_pct, emotion),
            pitch: emotion::pitch_string(self.config.base_pitch_hz, emotion),
        };

        debug!(rate = %request.rate, pitch = %request.pitch, "Synthesizing with Edge gateway");

        let response = self
            .client
            .post(self.synthesize_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let bytes = response.bytes().await?;
        debug!(audio_size = bytes.len(), "Edge synthesis complete");

        Ok(AudioData::new(bytes.to_vec(), AudioFormat::Mp3))
    }

    fn output_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn name(&self) -> &'static str {
        "edge-tts"
    }
}
