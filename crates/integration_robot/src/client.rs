//! Robot bridge HTTP client
//!
//! One persistent session to the bridge daemon. Audio delivery runs the
//! probe-then-reconnect-once discipline; playback is a single blocking
//! request so the caller knows exactly when the speakers go quiet.

use std::time::Duration;

use domain::AudioFormat;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::RobotConfig;
use crate::error::RobotError;

/// Client for the robot bridge daemon
#[derive(Debug)]
pub struct RobotClient {
    client: Client,
    config: RobotConfig,
    /// The one live session; recreated lazily after a failed probe
    session: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct AudioResponse {
    audio_id: String,
}

impl RobotClient {
    /// Create a new bridge client
    ///
    /// No connection is made yet; the session is opened lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns `RobotError::Configuration` if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: RobotConfig) -> Result<Self, RobotError> {
        config.validate().map_err(RobotError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.control_timeout_ms))
            .build()
            .map_err(|e| RobotError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            session: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RobotError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(RobotError::Unavailable(format!("HTTP {status}: {body}")));
        }
        Err(RobotError::RequestFailed(format!("HTTP {status}: {body}")))
    }

    async fn open_session(&self) -> Result<String, RobotError> {
        let response = self
            .authorize(self.client.post(self.url("/api/session")))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| RobotError::InvalidResponse(format!("Bad session response: {e}")))?;

        info!(session_id = %session.session_id, "Robot bridge session opened");
        Ok(session.session_id)
    }

    async fn ping(&self, session_id: &str) -> Result<(), RobotError> {
        let response = self
            .authorize(
                self.client
                    .get(self.url(&format!("/api/session/{session_id}/ping"))),
            )
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn close_session(&self, session_id: &str) {
        // Best effort; the bridge reaps dead sessions on its own anyway
        let result = self
            .authorize(
                self.client
                    .delete(self.url(&format!("/api/session/{session_id}"))),
            )
            .send()
            .await;
        if let Err(e) = result {
            debug!(error = %e, "Failed to close stale session");
        }
    }

    /// Get a session without probing, opening one if none exists
    ///
    /// Used by LED/gesture traffic where a stale session surfaces as a fast
    /// request error on the call itself.
    async fn session_lazy(&self) -> Result<String, RobotError> {
        let mut guard = self.session.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }
        let id = self.open_session().await?;
        *guard = Some(id.clone());
        Ok(id)
    }

    /// Get a probed session for audio delivery
    ///
    /// Runs a real ping round-trip; on failure the session is closed and
    /// recreated exactly once. A second failure fails the delivery.
    async fn session_for_delivery(&self) -> Result<String, RobotError> {
        let mut guard = self.session.lock().await;

        if let Some(id) = guard.as_ref() {
            match self.ping(id).await {
                Ok(()) => return Ok(id.clone()),
                Err(e) => {
                    warn!(session_id = %id, error = %e, "Liveness probe failed, recreating session");
                    self.close_session(id).await;
                    *guard = None;
                },
            }
        }

        match self.open_session().await {
            Ok(id) => {
                *guard = Some(id.clone());
                Ok(id)
            },
            Err(e) => Err(RobotError::Unavailable(format!(
                "Session recreation failed: {e}"
            ))),
        }
    }

    /// Check bridge liveness end to end
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the session cannot be established or
    /// the ping round-trip fails.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;
        self.ping(&session).await
    }

    /// Upload audio to the bridge, returning the remote audio id
    ///
    /// # Errors
    ///
    /// Returns `RobotError::Unavailable` when the session cannot be
    /// (re-)established, or a request error from the upload itself.
    #[instrument(skip(self, data), fields(size = data.len(), format = %format))]
    pub async fn upload_audio(
        &self,
        data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<String, RobotError> {
        let session = self.session_for_delivery().await?;

        let response = self
            .authorize(self.client.post(self.url("/api/audio")))
            .header("X-Session", &session)
            .header("Content-Type", format.mime_type())
            .body(data)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let audio: AudioResponse = response
            .json()
            .await
            .map_err(|e| RobotError::InvalidResponse(format!("Bad upload response: {e}")))?;

        debug!(audio_id = %audio.audio_id, "Audio uploaded to robot");
        Ok(audio.audio_id)
    }

    /// Play an uploaded audio buffer through the robot's speakers
    ///
    /// Blocks until the bridge reports playback complete, bounded by the
    /// configured playback timeout.
    ///
    /// # Errors
    ///
    /// Returns `RobotError::PlaybackFailed` when the bridge rejects or aborts
    /// playback.
    #[instrument(skip(self))]
    pub async fn play_audio(&self, audio_id: &str) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;

        let response = self
            .authorize(
                self.client
                    .post(self.url(&format!("/api/audio/{audio_id}/play"))),
            )
            .header("X-Session", &session)
            .timeout(Duration::from_millis(self.config.playback_timeout_ms))
            .send()
            .await
            .map_err(|e| RobotError::PlaybackFailed(e.to_string()))?;

        Self::check_status(response)
            .await
            .map_err(|e| RobotError::PlaybackFailed(e.to_string()))?;

        debug!("Playback complete");
        Ok(())
    }

    /// Delete an uploaded audio buffer
    ///
    /// # Errors
    ///
    /// Returns a request error; callers treat cleanup as best-effort.
    #[instrument(skip(self))]
    pub async fn delete_audio(&self, audio_id: &str) -> Result<(), RobotError> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("/api/audio/{audio_id}"))))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Speak through the robot's built-in voice
    ///
    /// The degraded path used when every synthesis tier is exhausted; lower
    /// quality, but the user never gets silence.
    ///
    /// # Errors
    ///
    /// Returns `RobotError::PlaybackFailed` when the built-in voice fails.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn say(&self, text: &str) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;

        let response = self
            .authorize(self.client.post(self.url("/api/tts/say")))
            .header("X-Session", &session)
            .timeout(Duration::from_millis(self.config.playback_timeout_ms))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| RobotError::PlaybackFailed(e.to_string()))?;

        Self::check_status(response)
            .await
            .map_err(|e| RobotError::PlaybackFailed(e.to_string()))?;
        Ok(())
    }

    /// Fade the configured LED group to a packed `0x00RRGGBB` color
    ///
    /// # Errors
    ///
    /// Returns a request error; the visual state machine treats LED writes as
    /// best-effort.
    #[instrument(skip(self))]
    pub async fn fade_leds(&self, rgb: u32, seconds: f32) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;

        let response = self
            .authorize(self.client.post(self.url("/api/leds/fade")))
            .header("X-Session", &session)
            .json(&serde_json::json!({
                "group": self.config.led_group,
                "rgb": rgb,
                "seconds": seconds,
            }))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Run a named gesture, returning when the motion completes
    ///
    /// # Errors
    ///
    /// Returns a request error; gesture dispatch treats these as best-effort.
    #[instrument(skip(self))]
    pub async fn run_gesture(&self, name: &str) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;

        let response = self
            .authorize(self.client.post(self.url(&format!("/api/gestures/{name}"))))
            .header("X-Session", &session)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Set the speaker volume (0-100)
    ///
    /// # Errors
    ///
    /// Returns a request error when the bridge rejects the volume.
    #[instrument(skip(self))]
    pub async fn set_volume(&self, volume: u8) -> Result<(), RobotError> {
        let session = self.session_lazy().await?;

        let response = self
            .authorize(self.client.post(self.url("/api/audio/volume")))
            .header("X-Session", &session)
            .json(&serde_json::json!({ "volume": f32::from(volume.min(100)) / 100.0 }))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
