//! Emotion tags attached to utterances by the dialogue layer

use serde::{Deserialize, Serialize};

use super::{Gesture, LedColor};

/// Emotional coloring of a single utterance
///
/// Tags arrive as free-form strings from the dialogue layer; parsing is
/// lenient and anything unrecognized collapses to `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionTag {
    /// Warm, content delivery
    Happy,
    /// Subdued, slower delivery
    Sad,
    /// High-energy delivery
    Excited,
    /// Inquisitive delivery
    Curious,
    /// Startled delivery
    Surprised,
    /// Plain delivery, the default
    #[default]
    Neutral,
}

impl EmotionTag {
    /// All supported tags, in a stable order
    pub const ALL: [Self; 6] = [
        Self::Happy,
        Self::Sad,
        Self::Excited,
        Self::Curious,
        Self::Surprised,
        Self::Neutral,
    ];

    /// Parse a tag from the dialogue layer
    ///
    /// Unknown or absent labels map to `Neutral` - never an error, so a
    /// misbehaving upstream model can not break speech output.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("happy" | "cheerful") => Self::Happy,
            Some("sad") => Self::Sad,
            Some("excited") => Self::Excited,
            Some("curious") => Self::Curious,
            Some("surprised") => Self::Surprised,
            _ => Self::Neutral,
        }
    }

    /// Eye LED color held for the duration of a speaking phase
    #[must_use]
    pub const fn led_color(&self) -> LedColor {
        match self {
            Self::Happy => LedColor::Yellow,
            Self::Sad => LedColor::Blue,
            Self::Excited => LedColor::Magenta,
            Self::Curious => LedColor::Cyan,
            Self::Surprised => LedColor::Green,
            Self::Neutral => LedColor::White,
        }
    }

    /// Gesture fired once at speech onset for this emotion
    #[must_use]
    pub const fn onset_gesture(&self) -> Gesture {
        match self {
            Self::Happy => Gesture::Nod,
            Self::Sad => Gesture::Bow,
            Self::Excited => Gesture::Excited,
            Self::Curious => Gesture::Thinking,
            Self::Surprised => Gesture::Shrug,
            Self::Neutral => Gesture::Explaining,
        }
    }

    /// Canonical lowercase label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Curious => "curious",
            Self::Surprised => "surprised",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_parse() {
        assert_eq!(EmotionTag::from_label(Some("happy")), EmotionTag::Happy);
        assert_eq!(EmotionTag::from_label(Some("sad")), EmotionTag::Sad);
        assert_eq!(EmotionTag::from_label(Some("excited")), EmotionTag::Excited);
        assert_eq!(EmotionTag::from_label(Some("curious")), EmotionTag::Curious);
        assert_eq!(
            EmotionTag::from_label(Some("surprised")),
            EmotionTag::Surprised
        );
        assert_eq!(EmotionTag::from_label(Some("neutral")), EmotionTag::Neutral);
    }

    #[test]
    fn parsing_is_case_insensitive_and_trims() {
        assert_eq!(EmotionTag::from_label(Some(" HAPPY ")), EmotionTag::Happy);
        assert_eq!(EmotionTag::from_label(Some("Excited")), EmotionTag::Excited);
    }

    #[test]
    fn cheerful_is_an_alias_for_happy() {
        assert_eq!(EmotionTag::from_label(Some("cheerful")), EmotionTag::Happy);
    }

    #[test]
    fn unknown_label_maps_to_neutral() {
        assert_eq!(
            EmotionTag::from_label(Some("melancholic")),
            EmotionTag::Neutral
        );
        assert_eq!(EmotionTag::from_label(Some("")), EmotionTag::Neutral);
    }

    #[test]
    fn absent_label_maps_to_neutral() {
        assert_eq!(EmotionTag::from_label(None), EmotionTag::Neutral);
    }

    #[test]
    fn every_tag_has_a_distinct_led_color() {
        let mut colors: Vec<LedColor> = EmotionTag::ALL.iter().map(EmotionTag::led_color).collect();
        colors.sort_by_key(|c| c.rgb());
        colors.dedup();
        assert_eq!(colors.len(), EmotionTag::ALL.len());
    }

    #[test]
    fn every_tag_has_an_onset_gesture() {
        for tag in EmotionTag::ALL {
            // Total mapping - just exercise it
            let _ = tag.onset_gesture();
        }
    }

    #[test]
    fn label_round_trips_through_from_label() {
        for tag in EmotionTag::ALL {
            assert_eq!(EmotionTag::from_label(Some(tag.label())), tag);
        }
    }
}
