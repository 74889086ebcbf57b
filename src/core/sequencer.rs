/// Beat sequencing: plays a dialogue beat by beat on top of the reveal
/// animator, waiting for the continue signal between beats.
///
/// Everything happens inside [`DialoguePlayer::tick`], which the host
/// calls once per frame. Waiting is just a phase the player stays in
/// between ticks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::reveal::{ConfigError, RevealAnimator, RevealConfig};
use crate::core::signal::ContinueSignal;
use crate::core::surface::PresentationSurface;
use crate::schema::beat::Beat;
use crate::schema::dialogue::Dialogue;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Where the player is in the reveal-then-wait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Nothing has been played yet.
    #[default]
    Idle,
    Revealing,
    AwaitingContinue,
    /// Terminal until the next `play`.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequencerState {
    /// `None` before the first beat starts; equals the beat count once done.
    pub current_beat_index: Option<usize>,
    pub phase: Phase,
}

/// Transitions reported by `play` and `tick`. At most one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    BeatStarted { index: usize },
    RevealFinished { index: usize },
    ContinueAccepted { index: usize },
    Finished,
}

/// Plays dialogues onto a presentation surface.
pub struct DialoguePlayer<S> {
    surface: S,
    reveal: RevealAnimator,
    signal: Option<Box<dyn ContinueSignal>>,
    dialogue: Option<Arc<Dialogue>>,
    state: SequencerState,
    /// Set on the tick a continue is accepted; the following tick is idle.
    debounce_pending: bool,
    playback: u64,
}

/// Builder for constructing a `DialoguePlayer`.
#[derive(Default)]
pub struct DialoguePlayerBuilder {
    config: Option<RevealConfig>,
    config_path: Option<PathBuf>,
    seconds_per_character: Option<f32>,
    speed_up_factor: Option<f32>,
    signal: Option<Box<dyn ContinueSignal>>,
}

impl<S: PresentationSurface> DialoguePlayer<S> {
    /// A player with the given timing and no continue signal wired.
    pub fn new(config: RevealConfig, surface: S) -> Self {
        Self {
            surface,
            reveal: RevealAnimator::new(config),
            signal: None,
            dialogue: None,
            state: SequencerState::default(),
            debounce_pending: false,
            playback: 0,
        }
    }

    /// Start playing `dialogue` from its first beat.
    ///
    /// Any playback already running is abandoned first: its reveal is
    /// cancelled before the new dialogue touches the surface. `None` is
    /// rejected without changing any state.
    pub fn play(
        &mut self,
        dialogue: impl Into<Option<Arc<Dialogue>>>,
    ) -> Result<PlaybackEvent, PlayerError> {
        let dialogue = dialogue
            .into()
            .ok_or(PlayerError::InvalidInput("dialogue is absent"))?;

        if self.is_playing() {
            tracing::debug!(
                playback = self.playback,
                beat = ?self.state.current_beat_index,
                "superseding playback"
            );
        }
        self.reveal.cancel();
        self.debounce_pending = false;
        self.playback += 1;
        self.state = SequencerState::default();

        tracing::debug!(
            playback = self.playback,
            beats = dialogue.len(),
            "playback started"
        );
        self.dialogue = Some(dialogue);
        self.surface.set_visible(true);
        Ok(self.begin_beat(0))
    }

    /// Abandon the current playback and hide the surface.
    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }
        tracing::debug!(playback = self.playback, "playback stopped");
        self.reveal.cancel();
        self.debounce_pending = false;
        self.finish();
    }

    /// Advance by one frame that took `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<PlaybackEvent> {
        let index = self.state.current_beat_index.unwrap_or(0);
        match self.state.phase {
            Phase::Idle | Phase::Done => None,
            Phase::Revealing => {
                self.reveal.advance(dt, &mut self.surface);
                if self.reveal.is_playing() {
                    if self.sample_signal() {
                        self.reveal.request_speed_up();
                    }
                    None
                } else {
                    self.state.phase = Phase::AwaitingContinue;
                    self.surface.set_continue_prompt_visible(true);
                    tracing::debug!(playback = self.playback, beat = index, "beat revealed");
                    Some(PlaybackEvent::RevealFinished { index })
                }
            }
            Phase::AwaitingContinue if self.debounce_pending => {
                // Idle tick so one continue press is never read twice.
                self.debounce_pending = false;
                Some(self.begin_beat(index + 1))
            }
            Phase::AwaitingContinue => {
                if self.sample_signal() {
                    self.debounce_pending = true;
                    Some(PlaybackEvent::ContinueAccepted { index })
                } else {
                    None
                }
            }
        }
    }

    /// Wire, replace or remove the continue signal. It is queried live, so
    /// a player stalled waiting for one resumes as soon as it is wired.
    pub fn set_continue_signal(&mut self, signal: Option<Box<dyn ContinueSignal>>) {
        self.signal = signal;
    }

    pub fn has_continue_signal(&self) -> bool {
        self.signal.is_some()
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// True while revealing or waiting to continue.
    pub fn is_playing(&self) -> bool {
        matches!(self.state.phase, Phase::Revealing | Phase::AwaitingContinue)
    }

    pub fn dialogue(&self) -> Option<&Arc<Dialogue>> {
        self.dialogue.as_ref()
    }

    pub fn current_beat(&self) -> Option<&Beat> {
        let index = self.state.current_beat_index?;
        self.dialogue.as_ref()?.get(index)
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    pub fn config(&self) -> &RevealConfig {
        self.reveal.config()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn sample_signal(&mut self) -> bool {
        self.signal
            .as_mut()
            .is_some_and(|signal| signal.should_continue())
    }

    fn begin_beat(&mut self, index: usize) -> PlaybackEvent {
        self.state.current_beat_index = Some(index);

        let Some(dialogue) = self.dialogue.clone() else {
            return self.finish();
        };
        let Some(beat) = dialogue.get(index) else {
            return self.finish();
        };

        self.surface.set_speaker_name(beat.speaker_name());
        self.reveal.start(beat.text(), &mut self.surface);
        tracing::debug!(
            playback = self.playback,
            beat = index,
            speaker = beat.speaker_name(),
            "beat started"
        );
        if self.reveal.is_playing() {
            self.state.phase = Phase::Revealing;
            self.surface.set_continue_prompt_visible(false);
        } else {
            // Nothing to reveal: prompt in the same frame, no RevealFinished.
            self.state.phase = Phase::AwaitingContinue;
            self.surface.set_continue_prompt_visible(true);
        }
        PlaybackEvent::BeatStarted { index }
    }

    fn finish(&mut self) -> PlaybackEvent {
        self.state.phase = Phase::Done;
        self.dialogue = None;
        self.surface.set_visible(false);
        tracing::debug!(playback = self.playback, "playback finished");
        PlaybackEvent::Finished
    }
}

impl<S: fmt::Debug> fmt::Debug for DialoguePlayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialoguePlayer")
            .field("surface", &self.surface)
            .field("reveal", &self.reveal)
            .field("signal", &self.signal.is_some())
            .field("state", &self.state)
            .field("playback", &self.playback)
            .finish()
    }
}

impl DialoguePlayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RevealConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Read timing from a RON file. Takes precedence over `with_config`.
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides whatever config source is in use.
    pub fn seconds_per_character(mut self, seconds: f32) -> Self {
        self.seconds_per_character = Some(seconds);
        self
    }

    /// Overrides whatever config source is in use.
    pub fn speed_up_factor(mut self, factor: f32) -> Self {
        self.speed_up_factor = Some(factor);
        self
    }

    pub fn continue_signal(mut self, signal: impl ContinueSignal + 'static) -> Self {
        self.signal = Some(Box::new(signal));
        self
    }

    pub fn build<S: PresentationSurface>(self, surface: S) -> Result<DialoguePlayer<S>, PlayerError> {
        let base = match self.config_path {
            Some(ref path) => RevealConfig::load_from_ron(path)?,
            None => self.config.unwrap_or_default(),
        };
        let config = RevealConfig::new(
            self.seconds_per_character
                .unwrap_or(base.seconds_per_character()),
            self.speed_up_factor.unwrap_or(base.speed_up_factor()),
        )?;

        let mut player = DialoguePlayer::new(config, surface);
        player.signal = self.signal;
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signal::PulseSignal;
    use crate::core::surface::TextSurface;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Visible(bool),
        Speaker(String),
        Text(String),
        Count(usize),
        Prompt(bool),
    }

    #[derive(Debug, Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl PresentationSurface for RecordingSurface {
        fn set_visible(&mut self, visible: bool) {
            self.calls.push(Call::Visible(visible));
        }

        fn set_speaker_name(&mut self, name: &str) {
            self.calls.push(Call::Speaker(name.to_string()));
        }

        fn set_text(&mut self, text: &str) {
            self.calls.push(Call::Text(text.to_string()));
        }

        fn set_visible_character_count(&mut self, count: usize) {
            self.calls.push(Call::Count(count));
        }

        fn set_continue_prompt_visible(&mut self, visible: bool) {
            self.calls.push(Call::Prompt(visible));
        }
    }

    /// Replays a fixed list of answers, then answers `false`. Counts queries.
    #[derive(Clone, Default)]
    struct Script {
        answers: Rc<RefCell<VecDeque<bool>>>,
        queries: Rc<Cell<usize>>,
    }

    impl Script {
        fn push(&self, answers: &[bool]) {
            self.answers.borrow_mut().extend(answers.iter().copied());
        }

        fn queries(&self) -> usize {
            self.queries.get()
        }
    }

    impl ContinueSignal for Script {
        fn should_continue(&mut self) -> bool {
            self.queries.set(self.queries.get() + 1);
            self.answers.borrow_mut().pop_front().unwrap_or(false)
        }
    }

    fn dialogue(beats: &[(&str, &str)]) -> Arc<Dialogue> {
        Arc::new(
            beats
                .iter()
                .map(|(speaker, text)| Beat::new(*speaker, *text))
                .collect(),
        )
    }

    fn half_second() -> RevealConfig {
        RevealConfig::new(0.5, 2.0).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_player_is_idle() {
        let player = DialoguePlayer::new(half_second(), TextSurface::new());
        assert_eq!(player.state(), SequencerState::default());
        assert_eq!(player.phase(), Phase::Idle);
        assert!(!player.is_playing());
        assert!(player.current_beat().is_none());
        assert!(!player.has_continue_signal());
    }

    #[test]
    fn play_none_is_rejected_without_side_effects() {
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        let err = player.play(None).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidInput(_)));
        assert_eq!(player.state(), SequencerState::default());
        assert!(player.surface().calls.is_empty());
    }

    #[test]
    fn play_none_after_finish_keeps_done_state() {
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.play(dialogue(&[])).unwrap();
        let before = player.state();
        assert_eq!(before.phase, Phase::Done);

        assert!(player.play(None).is_err());
        assert_eq!(player.state(), before);
    }

    #[test]
    fn empty_dialogue_finishes_on_play() {
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        let event = player.play(dialogue(&[])).unwrap();

        assert_eq!(event, PlaybackEvent::Finished);
        assert_eq!(
            player.state(),
            SequencerState {
                current_beat_index: Some(0),
                phase: Phase::Done,
            }
        );
        assert_eq!(
            player.surface().calls,
            vec![Call::Visible(true), Call::Visible(false)]
        );
        assert_eq!(player.tick(ms(500)), None);
    }

    #[test]
    fn play_begins_first_beat() {
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        let event = player.play(dialogue(&[("Alice", "Hi")])).unwrap();

        assert_eq!(event, PlaybackEvent::BeatStarted { index: 0 });
        assert_eq!(player.phase(), Phase::Revealing);
        assert_eq!(player.current_beat().map(Beat::speaker_name), Some("Alice"));
        assert_eq!(
            player.surface().calls,
            vec![
                Call::Visible(true),
                Call::Speaker("Alice".to_string()),
                Call::Text("Hi".to_string()),
                Call::Count(0),
                Call::Prompt(false),
            ]
        );
    }

    #[test]
    fn beats_play_in_order() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        player
            .play(dialogue(&[("A", "one"), ("B", "two"), ("C", "three")]))
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..200 {
            if player.phase() == Phase::AwaitingContinue {
                signal.push(&[true]);
            }
            if let Some(event) = player.tick(ms(500)) {
                events.push(event);
            }
            if player.phase() == Phase::Done {
                break;
            }
        }
        assert_eq!(player.phase(), Phase::Done);
        assert_eq!(player.state().current_beat_index, Some(3));
        assert_eq!(events.last(), Some(&PlaybackEvent::Finished));

        let calls = &player.surface().calls;
        let speakers: Vec<&Call> = calls
            .iter()
            .filter(|c| matches!(c, Call::Speaker(_) | Call::Text(_)))
            .collect();
        assert_eq!(
            speakers,
            vec![
                &Call::Speaker("A".to_string()),
                &Call::Text("one".to_string()),
                &Call::Speaker("B".to_string()),
                &Call::Text("two".to_string()),
                &Call::Speaker("C".to_string()),
                &Call::Text("three".to_string()),
            ]
        );
        assert_eq!(calls.first(), Some(&Call::Visible(true)));
        assert_eq!(calls.last(), Some(&Call::Visible(false)));

        // The last beat was fully revealed before the surface was hidden.
        let hide_at = calls.len() - 1;
        let full_reveal_at = calls
            .iter()
            .rposition(|c| *c == Call::Count(5))
            .unwrap();
        assert!(full_reveal_at < hide_at);
    }

    #[test]
    fn event_sequence_for_one_beat() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        player.play(dialogue(&[("Alice", "ok")])).unwrap();

        assert_eq!(player.tick(ms(500)), None);
        assert_eq!(
            player.tick(ms(500)),
            Some(PlaybackEvent::RevealFinished { index: 0 })
        );
        assert!(player.surface().is_continue_prompt_visible());

        signal.push(&[true]);
        assert_eq!(
            player.tick(ms(16)),
            Some(PlaybackEvent::ContinueAccepted { index: 0 })
        );
        assert_eq!(player.tick(ms(16)), Some(PlaybackEvent::Finished));
        assert!(!player.surface().is_visible());
    }

    #[test]
    fn continue_press_is_not_read_twice() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        player
            .play(dialogue(&[("Alice", "a"), ("Bob", "long line")]))
            .unwrap();

        player.tick(ms(500));
        assert_eq!(player.phase(), Phase::AwaitingContinue);

        // The press stays down for two frames.
        signal.push(&[true, true]);
        let queries_before = signal.queries();
        assert_eq!(
            player.tick(ms(16)),
            Some(PlaybackEvent::ContinueAccepted { index: 0 })
        );
        assert_eq!(
            player.tick(ms(16)),
            Some(PlaybackEvent::BeatStarted { index: 1 })
        );
        // Only the accepting tick queried the signal.
        assert_eq!(signal.queries(), queries_before + 1);
        assert!(!player.reveal().state().sped_up);

        // The next revealing tick sees the second frame of the press.
        player.tick(ms(500));
        assert!(player.reveal().state().sped_up);
    }

    #[test]
    fn signal_sampled_at_most_once_per_tick() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        player.play(dialogue(&[("A", "abc"), ("B", "de")])).unwrap();

        for tick in 1..=40 {
            if player.phase() == Phase::AwaitingContinue {
                signal.push(&[true]);
            }
            player.tick(ms(500));
            assert!(signal.queries() <= tick);
        }
        assert_eq!(player.phase(), Phase::Done);
    }

    #[test]
    fn holding_continue_speeds_up_reveal() {
        let mut player = DialoguePlayerBuilder::new()
            .with_config(half_second())
            .continue_signal(|| true)
            .build(TextSurface::new())
            .unwrap();
        player.play(dialogue(&[("Alice", "abcd")])).unwrap();

        // First character at the normal delay, speed-up requested after it.
        player.tick(ms(500));
        assert!(player.reveal().state().sped_up);
        assert_eq!(player.surface().visible_text(), "a");

        player.tick(ms(250));
        player.tick(ms(250));
        assert_eq!(player.surface().visible_text(), "abc");
        assert_eq!(
            player.tick(ms(250)),
            Some(PlaybackEvent::RevealFinished { index: 0 })
        );
    }

    #[test]
    fn end_to_end_alice_and_bob() {
        let config = RevealConfig::new(0.1, 2.0).unwrap();
        let base = config.character_delay();
        let fast = config.sped_up_delay();

        let pressed = Rc::new(Cell::new(false));
        let held = Rc::clone(&pressed);
        let mut player = DialoguePlayer::new(config, TextSurface::new());
        player.set_continue_signal(Some(Box::new(move || held.get())));
        player
            .play(dialogue(&[("Alice", "Hi"), ("Bob", "Yo")]))
            .unwrap();

        // Beat 0: two normal-rate ticks with no continue.
        assert_eq!(player.tick(base), None);
        assert_eq!(player.surface().visible_text(), "H");
        assert_eq!(
            player.tick(base),
            Some(PlaybackEvent::RevealFinished { index: 0 })
        );
        assert_eq!(player.surface().visible_text(), "Hi");
        assert!(!player.reveal().state().sped_up);

        // From here on the player holds the button.
        pressed.set(true);
        assert_eq!(
            player.tick(base),
            Some(PlaybackEvent::ContinueAccepted { index: 0 })
        );
        assert_eq!(
            player.tick(base),
            Some(PlaybackEvent::BeatStarted { index: 1 })
        );
        assert_eq!(player.surface().speaker_name(), "Bob");

        // Beat 1: first character at the normal rate, the rest sped up.
        assert_eq!(player.tick(base), None);
        assert!(player.reveal().state().sped_up);
        assert_eq!(
            player.tick(fast),
            Some(PlaybackEvent::RevealFinished { index: 1 })
        );
        assert_eq!(player.surface().visible_text(), "Yo");

        assert_eq!(
            player.tick(base),
            Some(PlaybackEvent::ContinueAccepted { index: 1 })
        );
        assert_eq!(player.tick(base), Some(PlaybackEvent::Finished));
        assert_eq!(player.state().current_beat_index, Some(2));
        assert!(!player.surface().is_visible());
    }

    #[test]
    fn missing_signal_stalls_until_wired() {
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.play(dialogue(&[("Alice", "x")])).unwrap();
        player.tick(ms(500));
        assert_eq!(player.phase(), Phase::AwaitingContinue);

        for _ in 0..100 {
            assert_eq!(player.tick(ms(500)), None);
        }
        assert_eq!(player.phase(), Phase::AwaitingContinue);

        let pulse = PulseSignal::new();
        player.set_continue_signal(Some(Box::new(pulse.clone())));
        assert_eq!(player.tick(ms(16)), None);
        pulse.pulse();
        assert_eq!(
            player.tick(ms(16)),
            Some(PlaybackEvent::ContinueAccepted { index: 0 })
        );
        assert_eq!(player.tick(ms(16)), Some(PlaybackEvent::Finished));
    }

    #[test]
    fn empty_beat_goes_straight_to_waiting() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        let event = player
            .play(dialogue(&[("Narrator", ""), ("Alice", "Hi")]))
            .unwrap();

        assert_eq!(event, PlaybackEvent::BeatStarted { index: 0 });
        assert_eq!(player.phase(), Phase::AwaitingContinue);
        assert!(!player.reveal().is_playing());
        assert_eq!(
            player.surface().calls,
            vec![
                Call::Visible(true),
                Call::Speaker("Narrator".to_string()),
                Call::Text(String::new()),
                Call::Count(0),
                Call::Prompt(true),
            ]
        );

        signal.push(&[true]);
        assert_eq!(
            player.tick(Duration::ZERO),
            Some(PlaybackEvent::ContinueAccepted { index: 0 })
        );
        assert_eq!(
            player.tick(Duration::ZERO),
            Some(PlaybackEvent::BeatStarted { index: 1 })
        );
        assert_eq!(player.phase(), Phase::Revealing);
        assert_eq!(player.surface().calls.last(), Some(&Call::Prompt(false)));
    }

    #[test]
    fn new_play_supersedes_running_one() {
        let mut player = DialoguePlayer::new(half_second(), RecordingSurface::default());
        player
            .play(dialogue(&[("Old", "stale text"), ("Old", "more")]))
            .unwrap();
        player.tick(ms(500));
        player.tick(ms(300));

        let mark = player.surface().calls.len();
        let event = player.play(dialogue(&[("New", "fresh")])).unwrap();
        assert_eq!(event, PlaybackEvent::BeatStarted { index: 0 });
        assert_eq!(player.state().current_beat_index, Some(0));
        assert_eq!(player.reveal().state().revealed_count, 0);
        assert_eq!(player.reveal().text(), "fresh");

        // The old reveal's partial wait does not finish a character early.
        player.tick(ms(300));
        assert_eq!(player.reveal().state().revealed_count, 0);

        let after: &[Call] = &player.surface().calls[mark..];
        assert!(!after.contains(&Call::Speaker("Old".to_string())));
        assert!(!after.contains(&Call::Text("stale text".to_string())));
        assert_eq!(after[0], Call::Visible(true));
    }

    #[test]
    fn play_while_waiting_discards_debounce() {
        let signal = Script::default();
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.set_continue_signal(Some(Box::new(signal.clone())));
        player.play(dialogue(&[("A", "a"), ("A", "b")])).unwrap();
        player.tick(ms(500));
        signal.push(&[true]);
        player.tick(ms(16));

        player.play(dialogue(&[("B", "xyz")])).unwrap();
        // Straight into revealing the new beat, no leftover idle tick.
        assert_eq!(player.phase(), Phase::Revealing);
        player.tick(ms(500));
        assert_eq!(player.surface().visible_text(), "x");
    }

    #[test]
    fn stop_hides_surface() {
        let mut player = DialoguePlayer::new(half_second(), TextSurface::new());
        player.play(dialogue(&[("Alice", "hello")])).unwrap();
        player.tick(ms(500));

        player.stop();
        assert_eq!(player.phase(), Phase::Done);
        assert!(!player.reveal().is_playing());
        assert!(!player.surface().is_visible());
        assert!(player.dialogue().is_none());
        assert_eq!(player.tick(ms(500)), None);
    }

    #[test]
    fn builder_overrides_config() {
        let player = DialoguePlayerBuilder::new()
            .config_file("tests/fixtures/reveal_config.ron")
            .speed_up_factor(8.0)
            .build(TextSurface::new())
            .unwrap();
        assert_eq!(player.config().seconds_per_character(), 0.05);
        assert_eq!(player.config().speed_up_factor(), 8.0);
    }

    #[test]
    fn builder_defaults() {
        let player = DialoguePlayerBuilder::new().build(TextSurface::new()).unwrap();
        assert_eq!(*player.config(), RevealConfig::default());
        assert!(!player.has_continue_signal());
    }

    #[test]
    fn builder_rejects_invalid_timing() {
        let result = DialoguePlayerBuilder::new()
            .seconds_per_character(0.0)
            .build(TextSurface::new());
        assert!(matches!(
            result,
            Err(PlayerError::Config(ConfigError::InvalidSecondsPerCharacter(_)))
        ));
    }

    #[test]
    fn builder_reports_missing_config_file() {
        let result = DialoguePlayerBuilder::new()
            .config_file("tests/fixtures/missing.ron")
            .build(TextSurface::new());
        assert!(matches!(result, Err(PlayerError::Config(ConfigError::Io(_)))));
    }
}
