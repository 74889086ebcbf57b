/// Where speaker names and revealed text end up.

use serde::Serialize;

/// Display operations the player drives. Implemented by the host's UI.
///
/// `set_text` always precedes the reveal of that text, and the visible
/// character count never exceeds the character length of the last text set.
pub trait PresentationSurface {
    fn set_visible(&mut self, visible: bool);
    fn set_speaker_name(&mut self, name: &str);
    fn set_text(&mut self, text: &str);
    fn set_visible_character_count(&mut self, count: usize);
    fn set_continue_prompt_visible(&mut self, visible: bool);
}

impl<S: PresentationSurface + ?Sized> PresentationSurface for Box<S> {
    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible)
    }

    fn set_speaker_name(&mut self, name: &str) {
        (**self).set_speaker_name(name)
    }

    fn set_text(&mut self, text: &str) {
        (**self).set_text(text)
    }

    fn set_visible_character_count(&mut self, count: usize) {
        (**self).set_visible_character_count(count)
    }

    fn set_continue_prompt_visible(&mut self, visible: bool) {
        (**self).set_continue_prompt_visible(visible)
    }
}

/// In-memory surface holding the latest value of every property.
///
/// Useful for terminal front ends, bindings that snapshot state once per
/// frame, and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextSurface {
    visible: bool,
    speaker_name: String,
    text: String,
    visible_characters: usize,
    continue_prompt_visible: bool,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    /// The full text buffer, including characters not yet revealed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visible_characters(&self) -> usize {
        self.visible_characters
    }

    pub fn is_continue_prompt_visible(&self) -> bool {
        self.continue_prompt_visible
    }

    /// The revealed prefix of the text buffer.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.visible_characters) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }
}

impl PresentationSurface for TextSurface {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_speaker_name(&mut self, name: &str) {
        self.speaker_name.clear();
        self.speaker_name.push_str(name);
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn set_visible_character_count(&mut self, count: usize) {
        self.visible_characters = count;
    }

    fn set_continue_prompt_visible(&mut self, visible: bool) {
        self.continue_prompt_visible = visible;
    }
}
