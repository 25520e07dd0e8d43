//! Port definitions
//!
//! Traits the infrastructure adapters implement. Result types are defined
//! locally so the application layer never leaks adapter crates upward.

mod presence_port;
mod robot_port;
mod status_port;
mod synthesis_port;

pub use presence_port::{GesturePort, LedPort};
pub use robot_port::{AudioTransportPort, FallbackVoicePort, PlaybackPort, RemoteAudio};
pub use status_port::{NoopStatus, ProgressStage, StatusPort};
pub use synthesis_port::{SynthesisPort, SynthesisTier, SynthesizedSpeech};

#[cfg(test)]
pub use presence_port::{MockGesturePort, MockLedPort};
#[cfg(test)]
pub use robot_port::{MockAudioTransportPort, MockFallbackVoicePort, MockPlaybackPort};
#[cfg(test)]
pub use synthesis_port::MockSynthesisPort;
