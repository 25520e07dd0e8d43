//! Presence ports - LED and gesture access for the visual state machine

use async_trait::async_trait;
use domain::{Gesture, LedColor};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the shared indicator LEDs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedPort: Send + Sync {
    /// Fade the indicator to a color
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Robot`; the presence controller logs and
    /// swallows these, a failed LED write must never abort an utterance.
    async fn fade(&self, color: LedColor, seconds: f32) -> Result<(), ApplicationError>;
}

/// Port for physical gesture execution
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GesturePort: Send + Sync {
    /// Run a gesture, returning when the motion completes
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Robot`; gesture dispatch is best-effort.
    async fn run(&self, gesture: Gesture) -> Result<(), ApplicationError>;
}
