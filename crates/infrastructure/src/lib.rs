//! Infrastructure layer
//!
//! Configuration loading and the adapters that bind the `ai_speech` and
//! `integration_robot` concretes to the application ports, plus the
//! composition root that wires a full speech stack from configuration.

pub mod adapters;
pub mod bootstrap;
pub mod config;

pub use adapters::{RobotBodyAdapter, RobotSpeakerAdapter, TieredSpeechAdapter};
pub use bootstrap::{SpeechStack, build_speech_stack};
pub use config::{AppConfig, PresenceSettings, SpeakSettings};
