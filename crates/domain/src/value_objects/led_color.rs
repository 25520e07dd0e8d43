//! Eye LED colors

use serde::{Deserialize, Serialize};

/// Named colors for the robot's eye LEDs
///
/// The wire value is a packed `0x00RRGGBB` integer, the encoding the LED
/// controller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    /// Steady blue, also the thinking pulse color
    Blue,
    /// Green
    Green,
    /// Red
    Red,
    /// Yellow
    Yellow,
    /// White, the idle default
    White,
    /// Magenta
    Magenta,
    /// Cyan
    Cyan,
    /// All LEDs dark
    Off,
}

impl LedColor {
    /// Packed `0x00RRGGBB` value for the LED controller
    #[must_use]
    pub const fn rgb(&self) -> u32 {
        match self {
            Self::Blue => 0x0000_00FF,
            Self::Green => 0x0000_FF00,
            Self::Red => 0x00FF_0000,
            Self::Yellow => 0x00FF_FF00,
            Self::White => 0x00FF_FFFF,
            Self::Magenta => 0x00FF_00FF,
            Self::Cyan => 0x0000_FFFF,
            Self::Off => 0x0000_0000,
        }
    }
}
