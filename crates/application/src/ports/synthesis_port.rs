//! Synthesis port - interface to the tiered text-to-speech stack

use async_trait::async_trait;
use domain::{AudioFormat, EmotionTag};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Which synthesis tier produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisTier {
    /// Fastest back-end, tightest rate limit
    Primary,
    /// Always-available back-end
    Secondary,
    /// Highest fidelity, quota-limited
    Tertiary,
}

impl std::fmt::Display for SynthesisTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Tertiary => write!(f, "tertiary"),
        }
    }
}

/// Result of a successful synthesis
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    /// Validated audio bytes
    pub audio: Vec<u8>,
    /// Container format of the audio
    pub format: AudioFormat,
    /// Tier that produced it
    pub tier: SynthesisTier,
}

/// Port for tiered speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize text with the given emotional coloring
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::SynthesisExhausted` when every tier was
    /// skipped or failed; individual provider failures are absorbed below
    /// this port.
    async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<SynthesizedSpeech, ApplicationError>;

    /// Clear all rate-limit flags immediately (operator recovery)
    fn reset_rate_limits(&self);

    /// Tier that produced the most recent successful synthesis
    fn last_used_tier(&self) -> Option<SynthesisTier>;
}
