//! WASM bindings for dialogue-player — powers the interactive web demo.
//!
//! The page drives the frame loop with `requestAnimationFrame`, forwards
//! clicks and key presses to `press_continue`, and redraws from `snapshot`.

use std::sync::Arc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use dialogue_player::core::reveal::RevealConfig;
use dialogue_player::core::sequencer::{DialoguePlayer, Phase, PlaybackEvent};
use dialogue_player::core::signal::PulseSignal;
use dialogue_player::core::surface::TextSurface;
use dialogue_player::schema::dialogue::Dialogue;

// ---------------------------------------------------------------------------
// Embedded sample dialogue — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const SAMPLE_DIALOGUE: &str = include_str!("../../tests/fixtures/greeting.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct Snapshot<'a> {
    phase: &'static str,
    beat_index: Option<usize>,
    beat_count: usize,
    sped_up: bool,
    surface: &'a TextSurface,
    visible_text: &'a str,
}

#[derive(serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum EventInfo {
    BeatStarted { index: usize },
    RevealFinished { index: usize },
    ContinueAccepted { index: usize },
    Finished,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------
fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Revealing => "revealing",
        Phase::AwaitingContinue => "awaiting_continue",
        Phase::Done => "done",
    }
}

fn event_info(event: PlaybackEvent) -> EventInfo {
    match event {
        PlaybackEvent::BeatStarted { index } => EventInfo::BeatStarted { index },
        PlaybackEvent::RevealFinished { index } => EventInfo::RevealFinished { index },
        PlaybackEvent::ContinueAccepted { index } => EventInfo::ContinueAccepted { index },
        PlaybackEvent::Finished => EventInfo::Finished,
    }
}

fn event_json(event: Option<PlaybackEvent>) -> Result<String, JsError> {
    serde_json::to_string(&event.map(event_info))
        .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// DialogueDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct DialogueDemo {
    player: DialoguePlayer<TextSurface>,
    pulse: PulseSignal,
    beat_count: usize,
}

#[wasm_bindgen]
impl DialogueDemo {
    /// Create a player with the given reveal timing.
    #[wasm_bindgen(constructor)]
    pub fn new(seconds_per_character: f32, speed_up_factor: f32) -> Result<DialogueDemo, JsError> {
        let config = RevealConfig::new(seconds_per_character, speed_up_factor)
            .map_err(|e| JsError::new(&format!("Config error: {e}")))?;

        let pulse = PulseSignal::new();
        let mut player = DialoguePlayer::new(config, TextSurface::new());
        player.set_continue_signal(Some(Box::new(pulse.clone())));

        Ok(DialogueDemo {
            player,
            pulse,
            beat_count: 0,
        })
    }

    /// Start playing a dialogue given as JSON. Returns the first event as JSON.
    ///
    /// Expected JSON shape:
    /// ```json
    /// { "beats": [ { "speaker": "Alice", "text": "Hi" } ] }
    /// ```
    pub fn load(&mut self, dialogue_json: &str) -> Result<String, JsError> {
        let dialogue: Dialogue = serde_json::from_str(dialogue_json)
            .map_err(|e| JsError::new(&format!("Invalid dialogue JSON: {e}")))?;
        self.start(dialogue)
    }

    /// Start playing the built-in sample dialogue.
    pub fn load_sample(&mut self) -> Result<String, JsError> {
        let dialogue = Dialogue::parse_ron(data::SAMPLE_DIALOGUE)
            .map_err(|e| JsError::new(&format!("Sample parse error: {e}")))?;
        self.start(dialogue)
    }

    /// Register a click or key press. Consumed by the next tick that
    /// listens for it.
    pub fn press_continue(&self) {
        self.pulse.pulse();
    }

    /// Advance one frame. Returns the resulting event as JSON, or `null`.
    pub fn tick(&mut self, dt_seconds: f64) -> Result<String, JsError> {
        let dt = Duration::try_from_secs_f64(dt_seconds)
            .map_err(|e| JsError::new(&format!("Invalid frame time: {e}")))?;
        event_json(self.player.tick(dt))
    }

    /// Abandon the current dialogue.
    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Return the current display state as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        let surface = self.player.surface();
        let snapshot = Snapshot {
            phase: phase_label(self.player.phase()),
            beat_index: self.player.state().current_beat_index,
            beat_count: self.beat_count,
            sped_up: self.player.reveal().state().sped_up,
            surface,
            visible_text: surface.visible_text(),
        };
        serde_json::to_string(&snapshot)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    fn start(&mut self, dialogue: Dialogue) -> Result<String, JsError> {
        self.beat_count = dialogue.len();
        let event = self
            .player
            .play(Arc::new(dialogue))
            .map_err(|e| JsError::new(&format!("Playback error: {e}")))?;
        event_json(Some(event))
    }
}
