//! Robot bridge configuration

use serde::{Deserialize, Serialize};

/// Configuration for the robot bridge connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Bridge base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the bridge, if it requires one
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Timeout for control requests (session, LEDs, gestures) in milliseconds
    #[serde(default = "default_control_timeout_ms")]
    pub control_timeout_ms: u64,

    /// Timeout for blocking playback/say requests in milliseconds
    ///
    /// Playback blocks for the full audio duration; this bounds it.
    #[serde(default = "default_playback_timeout_ms")]
    pub playback_timeout_ms: u64,

    /// LED group driven by the visual state machine
    #[serde(default = "default_led_group")]
    pub led_group: String,
}

fn default_base_url() -> String {
    "http://pepper.local:8070".to_string()
}

const fn default_control_timeout_ms() -> u64 {
    10_000 // 10 seconds
}

const fn default_playback_timeout_ms() -> u64 {
    120_000 // 2 minutes
}

fn default_led_group() -> String {
    "face".to_string()
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            control_timeout_ms: default_control_timeout_ms(),
            playback_timeout_ms: default_playback_timeout_ms(),
            led_group: default_led_group(),
        }
    }
}

impl RobotConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error description if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Robot bridge URL must not be empty".to_string());
        }
        if self.control_timeout_ms == 0 || self.playback_timeout_ms == 0 {
            return Err("Robot timeouts must be greater than 0".to_string());
        }
        if self.playback_timeout_ms < self.control_timeout_ms {
            return Err(
                "Playback timeout must be at least the control timeout".to_string()
            );
        }
        Ok(())
    }
}
