/// Dialogue content — ordered beats, RON loading, and named libraries.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::beat::Beat;
use crate::core::reveal::RevealConfig;

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("dialogue already registered: {0}")]
    DuplicateName(String),
}

/// An ordered sequence of beats played one after another.
///
/// Immutable once constructed. An empty dialogue is valid and finishes
/// as soon as it is played.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename = "Dialogue")]
pub struct Dialogue {
    beats: Vec<Beat>,
}

impl Dialogue {
    pub fn new(beats: Vec<Beat>) -> Self {
        Self { beats }
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn get(&self, index: usize) -> Option<&Beat> {
        self.beats.get(index)
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Total reveal time at normal speed, ignoring time spent waiting
    /// for the player to continue. Saturates at `Duration::MAX`.
    pub fn estimated_duration(&self, config: &RevealConfig) -> Duration {
        let characters: usize = self.beats.iter().map(Beat::character_count).sum();
        u32::try_from(characters)
            .ok()
            .and_then(|count| config.character_delay().checked_mul(count))
            .unwrap_or(Duration::MAX)
    }

    /// Load a dialogue from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Dialogue, DialogueError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a dialogue from a RON string.
    pub fn parse_ron(input: &str) -> Result<Dialogue, DialogueError> {
        Ok(ron::from_str(input)?)
    }
}

impl FromIterator<Beat> for Dialogue {
    fn from_iter<I: IntoIterator<Item = Beat>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Named dialogues, shared with whoever plays them.
#[derive(Debug, Clone, Default)]
pub struct DialogueLibrary {
    dialogues: FxHashMap<String, Arc<Dialogue>>,
}

impl DialogueLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialogue under `name`. Names are unique within a library.
    pub fn insert(&mut self, name: &str, dialogue: Dialogue) -> Result<(), DialogueError> {
        if self.dialogues.contains_key(name) {
            return Err(DialogueError::DuplicateName(name.to_string()));
        }
        self.dialogues.insert(name.to_string(), Arc::new(dialogue));
        Ok(())
    }

    /// Look up a dialogue. The result can be handed straight to
    /// `DialoguePlayer::play`, which rejects `None`.
    pub fn get(&self, name: &str) -> Option<Arc<Dialogue>> {
        self.dialogues.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dialogues.contains_key(name)
    }

    /// Dialogue names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialogues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Load every `.ron` file in `dir`, keyed by file stem.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, DialogueError> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("ron") {
                continue;
            }
            let Some(name) = dialogue_name(&path) else {
                tracing::warn!(path = %path.display(), "skipping dialogue with non-UTF-8 name");
                continue;
            };
            let dialogue = Dialogue::load_from_ron(&path)?;
            tracing::debug!(name, beats = dialogue.len(), "loaded dialogue");
            self.insert(name, dialogue)?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

// Library key for a dialogue file: its stem, when that is valid UTF-8.
fn dialogue_name(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()
}
