//! Speech synthesis errors

use thiserror::Error;

/// Errors that can occur during speech synthesis
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Provider quota exhausted; the tier is flagged until the next reset
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Network/service hiccup; causes fallthrough to the next tier
    #[error("Transient provider failure: {0}")]
    Transient(String),

    /// The provider rejected the request itself
    #[error("Unsupported request: {0}")]
    Unsupported(String),

    /// Produced bytes failed the container validity check
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every tier was skipped or failed; callers fall back to the robot's
    /// built-in voice
    #[error("All synthesis tiers exhausted")]
    AllTiersFailed,
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        // Connection-level failures are transient by definition; the next
        // tier gets its chance.
        Self::Transient(err.to_string())
    }
}
