//! Emotion parameter mapper
//!
//! Converts the closed set of emotion tags into provider-specific acoustic
//! parameters. Three control surfaces exist across the tier stack:
//!
//! - prosody deltas (speech rate / pitch) for the Edge gateway
//! - expressiveness knobs (stability / style) for ElevenLabs
//! - a leading style tag in the prompt text for Orpheus
//!
//! The mapping is total: every tag has parameters, and `Neutral` is the
//! no-op baseline unknown tags already collapsed to at parse time.

use domain::EmotionTag;

/// Rate/pitch deltas applied on top of the configured base prosody
///
/// Deltas are additive so a user-configured baseline speech rate survives
/// under every emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProsodyParams {
    /// Speech-rate delta in percent
    pub rate_pct: i32,
    /// Pitch delta in Hz
    pub pitch_hz: i32,
}

/// Expressiveness knobs for providers with voice-setting control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionParams {
    /// Voice stability (0.0 = volatile, 1.0 = monotone)
    pub stability: f32,
    /// Style exaggeration (0.0 = flat, 1.0 = theatrical)
    pub style: f32,
}

/// Prosody deltas for a rate/pitch-controllable provider
#[must_use]
pub const fn prosody(tag: EmotionTag) -> ProsodyParams {
    match tag {
        EmotionTag::Happy => ProsodyParams {
            rate_pct: 8,
            pitch_hz: 4,
        },
        EmotionTag::Sad => ProsodyParams {
            rate_pct: -12,
            pitch_hz: -6,
        },
        EmotionTag::Excited => ProsodyParams {
            rate_pct: 18,
            pitch_hz: 8,
        },
        EmotionTag::Curious => ProsodyParams {
            rate_pct: 4,
            pitch_hz: 6,
        },
        EmotionTag::Surprised => ProsodyParams {
            rate_pct: 12,
            pitch_hz: 10,
        },
        EmotionTag::Neutral => ProsodyParams {
            rate_pct: 0,
            pitch_hz: 0,
        },
    }
}

/// Voice settings for a stability/style-controllable provider
#[must_use]
pub const fn expression(tag: EmotionTag) -> ExpressionParams {
    match tag {
        EmotionTag::Happy => ExpressionParams {
            stability: 0.35,
            style: 0.55,
        },
        EmotionTag::Sad => ExpressionParams {
            stability: 0.70,
            style: 0.15,
        },
        EmotionTag::Excited => ExpressionParams {
            stability: 0.25,
            style: 0.80,
        },
        EmotionTag::Curious => ExpressionParams {
            stability: 0.50,
            style: 0.45,
        },
        EmotionTag::Surprised => ExpressionParams {
            stability: 0.30,
            style: 0.65,
        },
        EmotionTag::Neutral => ExpressionParams {
            stability: 0.55,
            style: 0.30,
        },
    }
}

/// Leading style tag for a prompt-driven provider, `None` for neutral
#[must_use]
pub const fn style_tag(tag: EmotionTag) -> Option<&'static str> {
    match tag {
        EmotionTag::Happy => Some("[cheerful]"),
        EmotionTag::Sad => Some("[sad]"),
        EmotionTag::Excited => Some("[excited]"),
        EmotionTag::Curious => Some("[curious]"),
        EmotionTag::Surprised => Some("[surprised]"),
        EmotionTag::Neutral => None,
    }
}

/// Prefix `text` with the style tag for `tag`, if any
#[must_use]
pub fn tag_prompt(text: &str, tag: EmotionTag) -> String {
    match style_tag(tag) {
        Some(prefix) => format!("{prefix} {text}"),
        None => text.to_string(),
    }
}

/// Format a signed rate percentage the Edge gateway understands
///
/// Adds the emotion delta to the configured base rate: `+0%` base with an
/// excited delta of `+18` yields `"+18%"`.
#[must_use]
pub fn rate_string(base_pct: i32, tag: EmotionTag) -> String {
    format!("{:+}%", base_pct + prosody(tag).rate_pct)
}

/// Format a signed pitch offset the Edge gateway understands
#[must_use]
pub fn pitch_string(base_hz: i32, tag: EmotionTag) -> String {
    format!("{:+}Hz", base_hz + prosody(tag).pitch_hz)
}
