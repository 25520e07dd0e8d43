//! AI Speech - tiered text-to-speech synthesis
//!
//! Turns utterance text plus an emotion tag into validated audio bytes using
//! one of three interchangeable synthesis back-ends:
//!
//! 1. Orpheus via the Groq API - fastest, tightest rate limit
//! 2. Edge neural TTS gateway - self-hosted, effectively unlimited
//! 3. ElevenLabs - highest fidelity, quota-limited, tried last so its quota
//!    survives for when the others are down
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the `SpeechSynthesizer` trait
//! - `providers` module contains the concrete back-ends
//! - `selector` walks the tiers in priority order, flags rate-limited
//!   providers until the next daily reset, and only accepts output that
//!   passes the magic-byte validity check
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{SpeechConfig, TieredSynthesizer};
//! use domain::EmotionTag;
//!
//! let tiers = build_tiers(&config)?;
//! let synthesizer = TieredSynthesizer::new(tiers, config.reset_hour)?;
//! let output = synthesizer.synthesize("Hello!", EmotionTag::Happy).await?;
//! println!("spoke via {}", output.tier);
//! ```

pub mod config;
pub mod emotion;
pub mod error;
pub mod ports;
pub mod providers;
pub mod selector;
pub mod types;
pub mod validity;

pub use config::{EdgeTtsConfig, ElevenLabsConfig, OrpheusConfig, SpeechConfig};
pub use error::SpeechError;
pub use ports::SpeechSynthesizer;
pub use providers::{EdgeTtsProvider, ElevenLabsProvider, OrpheusProvider};
pub use selector::{TierState, TieredSynthesizer};
pub use types::{AudioData, ProviderTier, SynthesisOutput};
