//! Application services

mod gesture_service;
mod presence_service;
mod speech_service;

pub use gesture_service::GestureDispatcher;
pub use presence_service::{PresenceConfig, PresenceController, PresenceHandle};
pub use speech_service::{SpeakConfig, SpeakOutcome, SpeechService};
