//! Application layer errors

use domain::DomainError;
use thiserror::Error;

/// Errors crossing the application boundary
///
/// Provider-level synthesis errors never appear here; the fallback selector
/// absorbs them. Only total synthesis failure and transport/playback failure
/// reach callers, which use them to trigger the degraded built-in voice.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Every synthesis tier was skipped or failed
    #[error("All synthesis tiers exhausted")]
    SynthesisExhausted,

    /// Synthesis infrastructure failed outside the tier walk
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Audio could not be moved to the robot after one reconnect attempt
    #[error("Audio transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Hardware playback failed
    #[error("Playback failed: {0}")]
    Playback(String),

    /// A robot command (LED, gesture, built-in voice) failed
    #[error("Robot command failed: {0}")]
    Robot(String),

    /// Invalid utterance
    #[error("Invalid utterance: {0}")]
    Domain(#[from] DomainError),
}
