//! Utterance entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::EmotionTag;

/// Maximum text length for a single utterance
///
/// Matches the longest input the tier-1 synthesis endpoint accepts; longer
/// responses are split upstream by the dialogue layer.
pub const MAX_UTTERANCE_CHARS: usize = 4096;

/// One text-to-speech request
///
/// Created per spoken response, consumed once and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to be spoken
    text: String,
    /// Emotional coloring requested by the dialogue layer
    emotion: EmotionTag,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Utterance {
    /// Create a new utterance
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyUtterance` for blank text and
    /// `DomainError::UtteranceTooLong` past [`MAX_UTTERANCE_CHARS`].
    pub fn new(text: impl Into<String>, emotion: EmotionTag) -> Result<Self, DomainError> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(DomainError::EmptyUtterance);
        }

        let length = text.chars().count();
        if length > MAX_UTTERANCE_CHARS {
            return Err(DomainError::UtteranceTooLong {
                length,
                max: MAX_UTTERANCE_CHARS,
            });
        }

        Ok(Self {
            text,
            emotion,
            created_at: Utc::now(),
        })
    }

    /// Create an utterance from a raw dialogue-layer tag label
    ///
    /// The label is parsed leniently; see [`EmotionTag::from_label`].
    pub fn with_label(text: impl Into<String>, label: Option<&str>) -> Result<Self, DomainError> {
        Self::new(text, EmotionTag::from_label(label))
    }

    /// The text to be spoken
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The emotion tag
    #[must_use]
    pub const fn emotion(&self) -> EmotionTag {
        self.emotion
    }

    /// Creation timestamp
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
