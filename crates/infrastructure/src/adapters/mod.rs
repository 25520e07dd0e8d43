//! Port adapters
//!
//! Thin implementations of the application ports delegating to the
//! `ai_speech` and `integration_robot` crates, mapping errors at the
//! boundary.

mod robot_adapter;
mod speech_adapter;

pub use robot_adapter::{RobotBodyAdapter, RobotSpeakerAdapter};
pub use speech_adapter::TieredSpeechAdapter;
