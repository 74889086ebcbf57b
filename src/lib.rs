//! Dialogue Player — tick-driven dialogue playback for games.
//!
//! Plays a linear script of speaker/text beats one at a time, revealing
//! each beat's text with a typewriter effect and advancing when the host's
//! continue signal fires. The host owns the frame loop and calls
//! [`DialoguePlayer::tick`] once per frame.

pub mod core;
pub mod schema;

pub use crate::core::reveal::{ConfigError, RevealAnimator, RevealConfig, RevealState};
pub use crate::core::sequencer::{
    DialoguePlayer, DialoguePlayerBuilder, Phase, PlaybackEvent, PlayerError, SequencerState,
};
pub use crate::core::signal::{ContinueSignal, PulseSignal};
pub use crate::core::surface::{PresentationSurface, TextSurface};
pub use crate::schema::beat::Beat;
pub use crate::schema::dialogue::{Dialogue, DialogueError, DialogueLibrary};
