//! Physical gestures the robot can perform

use serde::{Deserialize, Serialize};

/// The robot's gesture repertoire
///
/// Names match the gesture identifiers registered on the robot bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Wave hello/goodbye with the right arm
    Wave,
    /// Nod the head
    Nod,
    /// Shake the head
    ShakeHead,
    /// Hand to chin
    Thinking,
    /// Open-handed explaining movement
    Explaining,
    /// Both arms up
    Excited,
    /// Point forward with the right hand
    Point,
    /// Shoulders up, arms out
    Shrug,
    /// Both arms waving
    Celebrate,
    /// Head sweep left and right
    LookAround,
    /// Polite bow
    Bow,
}

impl Gesture {
    /// Gestures eligible for the background animation loop
    ///
    /// Deliberately the low-amplitude subset: big gestures are reserved for
    /// intentional firing at speech onset.
    pub const BACKGROUND: [Self; 4] = [Self::Explaining, Self::Nod, Self::LookAround, Self::Point];

    /// Identifier used by the robot bridge
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::Nod => "nod",
            Self::ShakeHead => "shake_head",
            Self::Thinking => "thinking",
            Self::Explaining => "explaining",
            Self::Excited => "excited",
            Self::Point => "point",
            Self::Shrug => "shrug",
            Self::Celebrate => "celebrate",
            Self::LookAround => "look_around",
            Self::Bow => "bow",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
