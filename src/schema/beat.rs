use serde::{Deserialize, Serialize};

/// A single line of dialogue spoken by a single speaker.
///
/// Beats have no identity beyond their position in a [`Dialogue`].
///
/// [`Dialogue`]: super::dialogue::Dialogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beat {
    #[serde(rename = "speaker")]
    speaker_name: String,
    text: String,
}

impl Beat {
    pub fn new(speaker_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            text: text.into(),
        }
    }

    /// The name of the speaker.
    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    /// The text that gets revealed for this beat.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of revealable characters (Unicode scalar values).
    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }
}
