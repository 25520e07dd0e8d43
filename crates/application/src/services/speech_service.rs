//! Speech pipeline - the `speak()` use case
//!
//! Orchestrates one utterance end to end:
//!
//! 1. tiered synthesis (no guard held)
//! 2. delivery to the robot (no guard held)
//! 3. guard acquisition with a short timeout
//! 4. enter-speaking, intentional gesture, playback, exit-speaking, cleanup
//!
//! The two-phase split is deliberate: a slow network transfer must never
//! block a concurrent stop/interrupt of other subsystems. Only hardware
//! playback holds the guard, and a caller that cannot get it within the
//! timeout is dropped, not queued - speech requests do not backlog.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::Utterance;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    AudioTransportPort, PlaybackPort, ProgressStage, RemoteAudio, StatusPort, SynthesisPort,
    SynthesisTier,
};
use crate::services::{GestureDispatcher, PresenceHandle};

/// Configuration for the speech pipeline
#[derive(Debug, Clone)]
pub struct SpeakConfig {
    /// How long a new utterance may wait for the playback guard
    pub guard_timeout: Duration,
}

impl Default for SpeakConfig {
    fn default() -> Self {
        Self {
            guard_timeout: Duration::from_secs(2),
        }
    }
}

/// How an accepted utterance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Played to completion
    Spoken {
        /// Synthesis tier that produced the audio
        tier: SynthesisTier,
    },
    /// Dropped because the speakers stayed busy past the guard timeout
    SkippedBusy,
}

/// Service orchestrating spoken output
pub struct SpeechService {
    synthesis: Arc<dyn SynthesisPort>,
    transport: Arc<dyn AudioTransportPort>,
    playback: Arc<dyn PlaybackPort>,
    presence: PresenceHandle,
    gestures: Arc<GestureDispatcher>,
    status: Arc<dyn StatusPort>,
    /// Guards hardware playback only, never synthesis or transfer
    playback_gate: Mutex<()>,
    config: SpeakConfig,
}

impl fmt::Debug for SpeechService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SpeechService {
    /// Create a new speech service
    pub fn new(
        synthesis: Arc<dyn SynthesisPort>,
        transport: Arc<dyn AudioTransportPort>,
        playback: Arc<dyn PlaybackPort>,
        presence: PresenceHandle,
        gestures: Arc<GestureDispatcher>,
        status: Arc<dyn StatusPort>,
    ) -> Self {
        Self::with_config(
            synthesis,
            transport,
            playback,
            presence,
            gestures,
            status,
            SpeakConfig::default(),
        )
    }

    /// Create a speech service with custom configuration
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        synthesis: Arc<dyn SynthesisPort>,
        transport: Arc<dyn AudioTransportPort>,
        playback: Arc<dyn PlaybackPort>,
        presence: PresenceHandle,
        gestures: Arc<GestureDispatcher>,
        status: Arc<dyn StatusPort>,
        config: SpeakConfig,
    ) -> Self {
        Self {
            synthesis,
            transport,
            playback,
            presence,
            gestures,
            status,
            playback_gate: Mutex::new(()),
            config,
        }
    }

    /// Speak one utterance end to end
    ///
    /// # Errors
    ///
    /// `ApplicationError::SynthesisExhausted` when every tier failed, and
    /// `ApplicationError::TransportUnavailable` / `ApplicationError::Playback`
    /// for delivery and hardware failures. Callers use these to trigger the
    /// degraded built-in voice.
    #[instrument(skip(self, utterance), fields(
        text_len = utterance.text().len(),
        emotion = %utterance.emotion()
    ))]
    pub async fn speak(&self, utterance: &Utterance) -> Result<SpeakOutcome, ApplicationError> {
        let started = Instant::now();

        // Phase one: synthesis and transfer, guard not held
        self.status.on_stage(ProgressStage::Generating);
        let speech = self
            .synthesis
            .synthesize(utterance.text(), utterance.emotion())
            .await?;
        debug!(tier = %speech.tier, size = speech.audio.len(), "Synthesis complete");

        self.status.on_stage(ProgressStage::Transferring);
        let remote = self.transport.deliver(&speech.audio, speech.format).await?;
        debug!(audio_id = %remote.id, "Audio staged on robot");

        // Phase two: exclusive hardware playback
        let Ok(gate) = timeout(self.config.guard_timeout, self.playback_gate.lock()).await else {
            warn!(
                timeout = ?self.config.guard_timeout,
                "Speakers busy past the guard timeout, dropping utterance"
            );
            self.discard(&remote).await;
            return Ok(SpeakOutcome::SkippedBusy);
        };

        self.status.on_stage(ProgressStage::Speaking);

        // Ordering contract: enter-speaking, then the intentional gesture,
        // then playback. The indicator request loses silently to thinking.
        if !self.presence.enter_speaking(utterance.emotion().led_color()).await {
            debug!("Speaking indicator suppressed, thinking holds the LEDs");
        }
        self.gestures
            .fire_intentional(utterance.emotion().onset_gesture())
            .await;

        let played = self.playback.play(&remote).await;

        // The background animation must be fully joined before the phase
        // ends, and the staged audio is reclaimed whatever happened
        self.presence.exit_speaking().await;
        self.discard(&remote).await;
        drop(gate);

        played?;

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(tier = %speech.tier, elapsed_ms, "Utterance spoken");

        Ok(SpeakOutcome::Spoken { tier: speech.tier })
    }

    /// Clear all synthesis rate-limit flags (operator recovery)
    pub fn reset_rate_limits(&self) {
        self.synthesis.reset_rate_limits();
    }

    /// Tier that produced the most recent successful synthesis
    #[must_use]
    pub fn last_used_tier(&self) -> Option<SynthesisTier> {
        self.synthesis.last_used_tier()
    }

    async fn discard(&self, remote: &RemoteAudio) {
        if let Err(e) = self.transport.discard(remote).await {
            warn!(audio_id = %remote.id, error = %e, "Remote audio cleanup failed");
        }
    }
}
