//! Value Objects - Immutable, identity-less domain primitives

mod audio_format;
mod emotion;
mod gesture;
mod led_color;
mod visual_state;

pub use audio_format::AudioFormat;
pub use emotion::EmotionTag;
pub use gesture::Gesture;
pub use led_color::LedColor;
pub use visual_state::VisualState;
