//! Configuration for speech synthesis

use serde::{Deserialize, Serialize};

/// Configuration for the tiered synthesis stack
///
/// Tier order is fixed: Orpheus, then the Edge gateway, then ElevenLabs.
/// Sections left out of the configuration file simply remove that tier from
/// the walk; at least one tier must remain.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpeechConfig {
    /// Primary tier: Orpheus via the Groq API
    #[serde(default)]
    pub orpheus: Option<OrpheusConfig>,

    /// Secondary tier: self-hosted Edge neural TTS gateway
    #[serde(default)]
    pub edge: Option<EdgeTtsConfig>,

    /// Tertiary tier: ElevenLabs
    #[serde(default)]
    pub eleven_labs: Option<ElevenLabsConfig>,

    /// Hour of day (robot-local) at which rate-limit flags clear
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,
}

/// Configuration for the Orpheus provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrpheusConfig {
    /// Groq API key
    pub api_key: String,

    /// API base URL (override for custom endpoints)
    #[serde(default = "default_orpheus_base_url")]
    pub base_url: String,

    /// TTS model identifier
    #[serde(default = "default_orpheus_model")]
    pub model: String,

    /// Voice name
    #[serde(default = "default_orpheus_voice")]
    pub voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Configuration for the Edge TTS gateway provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTtsConfig {
    /// Gateway base URL
    #[serde(default = "default_edge_base_url")]
    pub base_url: String,

    /// Neural voice identifier
    #[serde(default = "default_edge_voice")]
    pub voice: String,

    /// Baseline speech rate in percent; emotion deltas add to this
    #[serde(default)]
    pub base_rate_pct: i32,

    /// Baseline pitch offset in Hz; emotion deltas add to this
    #[serde(default)]
    pub base_pitch_hz: i32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Configuration for the ElevenLabs provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    /// ElevenLabs API key
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_eleven_base_url")]
    pub base_url: String,

    /// Voice identifier
    #[serde(default = "default_eleven_voice")]
    pub voice_id: String,

    /// Synthesis model
    #[serde(default = "default_eleven_model")]
    pub model_id: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_reset_hour() -> u32 {
    0 // Midnight
}

fn default_orpheus_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_orpheus_model() -> String {
    "canopylabs/orpheus-v1-english".to_string()
}

fn default_orpheus_voice() -> String {
    "hannah".to_string()
}

fn default_edge_base_url() -> String {
    "http://127.0.0.1:5500".to_string()
}

fn default_edge_voice() -> String {
    "en-US-AriaNeural".to_string()
}

fn default_eleven_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_eleven_voice() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string() // Rachel
}

fn default_eleven_model() -> String {
    "eleven_monolingual_v1".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            edge: Some(EdgeTtsConfig::default()),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error description if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.orpheus.is_none() && self.edge.is_none() && self.eleven_labs.is_none() {
            return Err("At least one synthesis tier must be configured".to_string());
        }

        if self.reset_hour >= 24 {
            return Err(format!(
                "Reset hour must be 0-23, got {}",
                self.reset_hour
            ));
        }

        if let Some(orpheus) = &self.orpheus {
            orpheus.validate()?;
        }
        if let Some(edge) = &self.edge {
            edge.validate()?;
        }
        if let Some(eleven) = &self.eleven_labs {
            eleven.validate()?;
        }

        Ok(())
    }
}

impl OrpheusConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("Orpheus API key must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Orpheus timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EdgeTtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_edge_base_url(),
            voice: default_edge_voice(),
            base_rate_pct: 0,
            base_pitch_hz: 0,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EdgeTtsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // The gateway clamps outside this window; reject early instead
        if !(-50..=100).contains(&self.base_rate_pct) {
            return Err(format!(
                "Base rate must be between -50% and +100%, got {}",
                self.base_rate_pct
            ));
        }
        if self.timeout_ms == 0 {
            return Err("Edge timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl ElevenLabsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("ElevenLabs API key must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("ElevenLabs timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
