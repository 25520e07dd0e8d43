//! Robot audio ports - transport, playback and the degraded voice
//!
//! Delivery and playback are deliberately two separate methods on two
//! separate ports: transfer runs outside the speech concurrency guard,
//! playback inside it. Keeping them apart stops an implementation from
//! accidentally widening the critical section around the network transfer.

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Handle to audio staged on the robot, awaiting playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAudio {
    /// Identifier assigned by the robot bridge
    pub id: String,
}

impl RemoteAudio {
    /// Create a handle from a bridge-assigned id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Port for moving audio onto the robot
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioTransportPort: Send + Sync {
    /// Deliver audio bytes over the persistent, health-checked connection
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::TransportUnavailable` when the connection
    /// cannot be established after one reconnect attempt.
    async fn deliver(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<RemoteAudio, ApplicationError>;

    /// Delete staged audio; fired after every playback attempt
    ///
    /// # Errors
    ///
    /// Returns a transport error; callers treat cleanup as best-effort.
    async fn discard(&self, audio: &RemoteAudio) -> Result<(), ApplicationError>;
}

/// Port for exclusive hardware playback
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    /// Play staged audio, blocking until the speakers go quiet
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Playback` when the hardware rejects or
    /// aborts playback.
    async fn play(&self, audio: &RemoteAudio) -> Result<(), ApplicationError>;
}

/// Port for the robot's built-in voice
///
/// The degraded path: lower quality than the synthesis tiers, but the user
/// never experiences total silence.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FallbackVoicePort: Send + Sync {
    /// Speak through the built-in voice
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Robot` when even the built-in voice fails.
    async fn say(&self, text: &str) -> Result<(), ApplicationError>;
}
