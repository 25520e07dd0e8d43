//! Orpheus speech provider (tier 1)
//!
//! Talks to the Orpheus TTS model hosted behind the Groq API. Fastest of the
//! three back-ends and the one with the tightest rate limit, so it is tried
//! first and flagged aggressively on 429s.
//!
//! Emotion control is prompt-driven: a leading `[style]` tag on the input
//! text, e.g. `[excited] We did it!`.

use std::time::Duration;

use async_trait::async_trait;
use domain::{AudioFormat, EmotionTag};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::OrpheusConfig;
use crate::emotion;
use crate::error::SpeechError;
use crate::ports::SpeechSynthesizer;
use crate::providers::classify_failure;
use crate::types::AudioData;

/// Orpheus TTS provider
#[derive(Debug, Clone)]
pub struct OrpheusProvider {
    client: Client,
    config: OrpheusConfig,
}

/// Request body for the speech endpoint
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl OrpheusProvider {
    /// Create a new Orpheus provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: OrpheusConfig) -> Result<Self, SpeechError> {
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
        format!("{}/audio/speech", self.config.base_url)
    }
}

#[async_trait]
impl SpeechSynthesizer for OrpheusProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), emotion = %emotion))]
    async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<AudioData, SpeechError> {
        let input = emotion::tag_prompt(text, emotion);
        debug!("Synthesizing with Orpheus");

        let request = SpeechRequest {
            model: &self.config.model,
            voice: &self.config.voice,
            input: &input,
            response_format: "wav",
        };

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let bytes = response.bytes().await?;
        debug!(audio_size = bytes.len(), "Orpheus synthesis complete");

        Ok(AudioData::new(bytes.to_vec(), AudioFormat::Wav))
    }

    fn output_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn name(&self) -> &'static str {
        "orpheus"
    }
}
