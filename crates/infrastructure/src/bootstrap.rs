//! Composition root
//!
//! Builds the full speech stack from configuration: providers, selector,
//! robot client, presence controller and the speech service.

use std::sync::Arc;

use application::{
    FallbackVoicePort, GestureDispatcher, PresenceController, PresenceHandle, SpeechService,
    StatusPort,
};
use integration_robot::RobotClient;
use tracing::info;

use crate::adapters::{RobotBodyAdapter, RobotSpeakerAdapter, TieredSpeechAdapter};
use crate::config::AppConfig;

/// A fully wired speech stack
pub struct SpeechStack {
    /// The speak() entry point
    pub speech: Arc<SpeechService>,
    /// Visual state control, for the dialogue layer's thinking indicator
    pub presence: PresenceHandle,
    /// Degraded built-in voice for total-failure fallback
    pub fallback_voice: Arc<dyn FallbackVoicePort>,
    /// Shared bridge client, for probes and volume control
    pub robot: Arc<RobotClient>,
}

impl std::fmt::Debug for SpeechStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechStack").finish_non_exhaustive()
    }
}

/// Wire the stack from configuration
///
/// # Errors
///
/// Returns an error string when a provider or the bridge client rejects its
/// configuration.
pub fn build_speech_stack(
    config: &AppConfig,
    status: Arc<dyn StatusPort>,
) -> Result<SpeechStack, String> {
    let synthesis = TieredSpeechAdapter::from_config(&config.speech)
        .map_err(|e| format!("speech stack: {e}"))?;

    let robot = Arc::new(
        RobotClient::new(config.robot.clone()).map_err(|e| format!("robot bridge: {e}"))?,
    );
    let speaker = Arc::new(RobotSpeakerAdapter::new(Arc::clone(&robot)));
    let body = Arc::new(RobotBodyAdapter::new(Arc::clone(&robot)));

    let gestures = Arc::new(GestureDispatcher::new(
        Arc::clone(&body) as Arc<dyn application::GesturePort>,
        config.presence.gesture_cooldown(),
    ));
    let presence = PresenceController::spawn(
        Arc::clone(&body) as Arc<dyn application::LedPort>,
        Arc::clone(&gestures),
        config.presence.to_presence_config(),
    );

    let speech = Arc::new(SpeechService::with_config(
        Arc::new(synthesis),
        Arc::clone(&speaker) as Arc<dyn application::AudioTransportPort>,
        Arc::clone(&speaker) as Arc<dyn application::PlaybackPort>,
        presence.clone(),
        gestures,
        status,
        config.speak.to_speak_config(),
    ));

    info!(tiers = config.configured_tiers(), "Speech stack assembled");

    Ok(SpeechStack {
        speech,
        presence,
        fallback_voice: speaker,
        robot,
    })
}
