//! Visual state of the shared eye-LED indicator

use serde::{Deserialize, Serialize};

use super::LedColor;

/// Process-wide state of the robot's indicator light
///
/// Priority order: `Thinking` > `Speaking` > `Idle`. A request to enter
/// `Speaking` while `Thinking` is active is dropped, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    /// Steady low-priority indicator
    #[default]
    Idle,
    /// Pulsing indicator while awaiting a synthesis/LLM result
    Thinking,
    /// Emotion color held for the whole playback
    Speaking(LedColor),
}

impl VisualState {
    /// Check whether the state is `Thinking`
    #[must_use]
    pub const fn is_thinking(&self) -> bool {
        matches!(self, Self::Thinking)
    }

    /// Check whether the state is `Speaking`
    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        matches!(self, Self::Speaking(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(VisualState::default(), VisualState::Idle);
    }

    #[test]
    fn predicates_match_variants() {
        assert!(VisualState::Thinking.is_thinking());
        assert!(!VisualState::Thinking.is_speaking());
        assert!(VisualState::Speaking(LedColor::Yellow).is_speaking());
        assert!(!VisualState::Idle.is_thinking());
        assert!(!VisualState::Idle.is_speaking());
    }
}
