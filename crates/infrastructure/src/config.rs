//! Application configuration
//!
//! Layered loading: a TOML file (default `peppervox.toml`) overridden by
//! `PEPPERVOX__`-prefixed environment variables, e.g.
//! `PEPPERVOX__ROBOT__BASE_URL=http://10.0.0.5:8070`.

use std::path::Path;
use std::time::Duration;

use ai_speech::SpeechConfig;
use application::{PresenceConfig, SpeakConfig};
use integration_robot::RobotConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Synthesis tier credentials and endpoints
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Robot bridge connection
    #[serde(default)]
    pub robot: RobotConfig,

    /// Visual/gesture presence tuning
    #[serde(default)]
    pub presence: PresenceSettings,

    /// Speech pipeline tuning
    #[serde(default)]
    pub speak: SpeakSettings,
}

/// Presence controller settings, in file-friendly units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceSettings {
    /// Thinking pulse half-period in milliseconds
    #[serde(default = "default_pulse_interval_ms")]
    pub pulse_interval_ms: u64,

    /// Background gesture polling granularity in milliseconds
    #[serde(default = "default_gesture_poll_interval_ms")]
    pub gesture_poll_interval_ms: u64,

    /// Per-tick probability of attempting a background gesture (0.0 - 1.0)
    #[serde(default = "default_gesture_probability")]
    pub gesture_probability: f64,

    /// Minimum window between any two gesture firings in milliseconds
    #[serde(default = "default_gesture_cooldown_ms")]
    pub gesture_cooldown_ms: u64,

    /// LED fade duration in seconds
    #[serde(default = "default_fade_seconds")]
    pub fade_seconds: f32,
}

/// Speech pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakSettings {
    /// How long a new utterance may wait for the playback guard, in
    /// milliseconds; past this it is dropped, not queued
    #[serde(default = "default_guard_timeout_ms")]
    pub guard_timeout_ms: u64,
}

const fn default_pulse_interval_ms() -> u64 {
    600
}

const fn default_gesture_poll_interval_ms() -> u64 {
    1000
}

const fn default_gesture_probability() -> f64 {
    0.25
}

const fn default_gesture_cooldown_ms() -> u64 {
    6000
}

const fn default_fade_seconds() -> f32 {
    0.3
}

const fn default_guard_timeout_ms() -> u64 {
    2000
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            pulse_interval_ms: default_pulse_interval_ms(),
            gesture_poll_interval_ms: default_gesture_poll_interval_ms(),
            gesture_probability: default_gesture_probability(),
            gesture_cooldown_ms: default_gesture_cooldown_ms(),
            fade_seconds: default_fade_seconds(),
        }
    }
}

impl Default for SpeakSettings {
    fn default() -> Self {
        Self {
            guard_timeout_ms: default_guard_timeout_ms(),
        }
    }
}

impl PresenceSettings {
    /// Convert to the application-layer presence configuration
    #[must_use]
    pub fn to_presence_config(&self) -> PresenceConfig {
        PresenceConfig {
            pulse_interval: Duration::from_millis(self.pulse_interval_ms),
            gesture_poll_interval: Duration::from_millis(self.gesture_poll_interval_ms),
            gesture_probability: self.gesture_probability,
            fade_seconds: self.fade_seconds,
            ..PresenceConfig::default()
        }
    }

    /// The gesture cooldown window
    #[must_use]
    pub const fn gesture_cooldown(&self) -> Duration {
        Duration::from_millis(self.gesture_cooldown_ms)
    }

    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.gesture_probability) {
            return Err(format!(
                "Gesture probability must be 0.0-1.0, got {}",
                self.gesture_probability
            ));
        }
        if self.pulse_interval_ms == 0 || self.gesture_poll_interval_ms == 0 {
            return Err("Presence intervals must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl SpeakSettings {
    /// Convert to the application-layer speak configuration
    #[must_use]
    pub const fn to_speak_config(&self) -> SpeakConfig {
        SpeakConfig {
            guard_timeout: Duration::from_millis(self.guard_timeout_ms),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.guard_timeout_ms == 0 {
            return Err("Guard timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from an optional file plus the environment
    ///
    /// # Errors
    ///
    /// Returns `config::ConfigError` when the file cannot be read, a value
    /// fails to deserialize, or validation rejects the merged configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("peppervox").required(false)),
        };

        let app_config: Self = builder
            .add_source(config::Environment::with_prefix("PEPPERVOX").separator("__"))
            .build()?
            .try_deserialize()?;

        app_config
            .validate()
            .map_err(config::ConfigError::Message)?;

        info!(
            tiers = app_config.configured_tiers(),
            robot = %app_config.robot.base_url,
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Validate the merged configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.speech.validate()?;
        self.robot.validate()?;
        self.presence.validate()?;
        self.speak.validate()?;
        Ok(())
    }

    /// Number of configured synthesis tiers
    #[must_use]
    pub const fn configured_tiers(&self) -> usize {
        self.speech.orpheus.is_some() as usize
            + self.speech.edge.is_some() as usize
            + self.speech.eleven_labs.is_some() as usize
    }
}
