//! ElevenLabs speech provider (tier 3)
//!
//! Highest fidelity of the three back-ends and also quota-limited, so it sits
//! at the bottom of the walk: its quota is preserved for the moments the
//! faster tiers are rate limited or down.
//!
//! Emotion control goes through voice settings: `stability` and `style`.

use std::time::Duration;

use async_trait::async_trait;
use domain::{AudioFormat, EmotionTag};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ElevenLabsConfig;
use crate::emotion;
use crate::error::SpeechError;
use crate::ports::SpeechSynthesizer;
use crate::providers::classify_failure;
use crate::types::AudioData;

/// ElevenLabs TTS provider
#[derive(Debug, Clone)]
pub struct ElevenLabsProvider {
    client: Client,
    config: ElevenLabsConfig,
}

/// Request body for the text-to-speech endpoint
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Expressiveness knobs derived from the emotion tag
#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
}

impl ElevenLabsProvider {
    /// Create a new ElevenLabs provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: ElevenLabsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn speech_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url, self.config.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), emotion = %emotion))]
    async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<AudioData, SpeechError> {
        let params = emotion::expression(emotion);
        debug!(
            stability = params.stability,
            style = params.style,
            "Synthesizing with ElevenLabs"
        );

        let request = SpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: params.stability,
                similarity_boost: 0.75,
                style: params.style,
            },
        };

        let response = self
            .client
            .post(self.speech_url())
            .header("xi-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let bytes = response.bytes().await?;
        debug!(audio_size = bytes.len(), "ElevenLabs synthesis complete");

        Ok(AudioData::new(bytes.to_vec(), AudioFormat::Mp3))
    }

    fn output_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }
}
