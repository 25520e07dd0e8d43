//! Robot bridge integration
//!
//! HTTP client for the bridge daemon running next to the robot's hardware.
//! The bridge owns the physical speakers, eye LEDs and joint motion; this
//! crate moves validated audio onto it, drives playback, and forwards LED and
//! gesture commands.
//!
//! Connection model: one session at a time. Every audio delivery is preceded
//! by a real ping round-trip; a stale "connected" flag after a network blip
//! is a known failure mode, so liveness is never inferred from local state.

pub mod client;
pub mod config;
pub mod error;

pub use client::RobotClient;
pub use config::RobotConfig;
pub use error::RobotError;
