//! Port definitions for speech synthesis
//!
//! Defines the trait every concrete synthesis back-end implements.

use async_trait::async_trait;
use domain::{AudioFormat, EmotionTag};

use crate::error::SpeechError;
use crate::types::AudioData;

/// Port for text-to-speech back-ends
///
/// Implementations map the emotion tag through their own control surface
/// (prosody deltas, voice settings or a prompt tag) before calling the
/// backing service. Providers touch no shared state; rate-limit bookkeeping
/// is the selector's job, driven by the `SpeechError::RateLimited` signal.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given emotional coloring
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::RateLimited` when the backing service reports an
    /// exhausted quota, `SpeechError::Transient` for network or service
    /// hiccups, and `SpeechError::Unsupported` when the request itself is
    /// rejected.
    async fn synthesize(&self, text: &str, emotion: EmotionTag)
    -> Result<AudioData, SpeechError>;

    /// The container format this back-end produces
    fn output_format(&self) -> AudioFormat;

    /// Short provider name for logs and operator tooling
    fn name(&self) -> &'static str;
}
