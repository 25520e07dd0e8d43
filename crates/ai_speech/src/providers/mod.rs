//! Speech synthesis provider implementations
//!
//! Contains concrete implementations of the `SpeechSynthesizer` trait, one
//! per tier.

pub mod edge;
pub mod eleven_labs;
pub mod orpheus;

pub use edge::EdgeTtsProvider;
pub use eleven_labs::ElevenLabsProvider;
pub use orpheus::OrpheusProvider;

use reqwest::StatusCode;

use crate::error::SpeechError;

/// Map a non-success HTTP response to the speech error taxonomy
///
/// A 429 always means rate limited; so does any error body mentioning an
/// exhausted quota, because some services report daily limits through 4xx
/// responses with a prose message instead of a proper status code.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> SpeechError {
    let lowered = body.to_lowercase();
    if status == StatusCode::TOO_MANY_REQUESTS
        || lowered.contains("rate limit")
        || lowered.contains("quota")
    {
        return SpeechError::RateLimited;
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return SpeechError::Configuration(format!("HTTP {status}: {body}"));
    }

    if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        return SpeechError::Transient(format!("HTTP {status}: {body}"));
    }

    SpeechError::Unsupported(format!("HTTP {status}: {body}"))
}
