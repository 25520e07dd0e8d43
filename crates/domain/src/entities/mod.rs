//! Entities - objects with identity and lifecycle

mod utterance;

pub use utterance::Utterance;
