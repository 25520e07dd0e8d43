//! Robot port adapters over the bridge client
//!
//! Two adapters share one `RobotClient`: the speaker adapter carries audio
//! traffic (transport, playback, built-in voice), the body adapter carries
//! LED and gesture traffic for the presence controller.

use std::sync::Arc;

use application::{
    ApplicationError, AudioTransportPort, FallbackVoicePort, GesturePort, LedPort, PlaybackPort,
    RemoteAudio,
};
use async_trait::async_trait;
use domain::{AudioFormat, Gesture, LedColor};
use integration_robot::{RobotClient, RobotError};

/// Audio-side adapter: transport, playback and the degraded voice
#[derive(Debug)]
pub struct RobotSpeakerAdapter {
    client: Arc<RobotClient>,
}

impl RobotSpeakerAdapter {
    /// Create an adapter over a shared bridge client
    #[must_use]
    pub const fn new(client: Arc<RobotClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AudioTransportPort for RobotSpeakerAdapter {
    async fn deliver(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<RemoteAudio, ApplicationError> {
        // Any delivery failure fails the utterance, whichever tier produced
        // the audio
        let audio_id = self
            .client
            .upload_audio(audio.to_vec(), format)
            .await
            .map_err(|e| ApplicationError::TransportUnavailable(e.to_string()))?;

        Ok(RemoteAudio::new(audio_id))
    }

    async fn discard(&self, audio: &RemoteAudio) -> Result<(), ApplicationError> {
        self.client
            .delete_audio(&audio.id)
            .await
            .map_err(|e| ApplicationError::TransportUnavailable(e.to_string()))
    }
}

#[async_trait]
impl PlaybackPort for RobotSpeakerAdapter {
    async fn play(&self, audio: &RemoteAudio) -> Result<(), ApplicationError> {
        self.client
            .play_audio(&audio.id)
            .await
            .map_err(|e| match e {
                RobotError::Unavailable(msg) => ApplicationError::TransportUnavailable(msg),
                other => ApplicationError::Playback(other.to_string()),
            })
    }
}

#[async_trait]
impl FallbackVoicePort for RobotSpeakerAdapter {
    async fn say(&self, text: &str) -> Result<(), ApplicationError> {
        self.client
            .say(text)
            .await
            .map_err(|e| ApplicationError::Robot(e.to_string()))
    }
}

/// Body-side adapter: LEDs and gestures
#[derive(Debug)]
pub struct RobotBodyAdapter {
    client: Arc<RobotClient>,
}

impl RobotBodyAdapter {
    /// Create an adapter over a shared bridge client
    #[must_use]
    pub const fn new(client: Arc<RobotClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LedPort for RobotBodyAdapter {
    async fn fade(&self, color: LedColor, seconds: f32) -> Result<(), ApplicationError> {
        self.client
            .fade_leds(color.rgb(), seconds)
            .await
            .map_err(|e| ApplicationError::Robot(e.to_string()))
    }
}

#[async_trait]
impl GesturePort for RobotBodyAdapter {
    async fn run(&self, gesture: Gesture) -> Result<(), ApplicationError> {
        self.client
            .run_gesture(gesture.name())
            .await
            .map_err(|e| ApplicationError::Robot(e.to_string()))
    }
}
