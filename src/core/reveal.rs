/// Typewriter reveal — shows a text one character at a time.
///
/// The animator is driven by [`RevealAnimator::advance`] with the time
/// elapsed since the previous tick. It never owns a clock of its own.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::surface::PresentationSurface;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("seconds_per_character must be positive and finite, got {0}")]
    InvalidSecondsPerCharacter(f32),
    #[error("speed_up_factor must be positive and finite, got {0}")]
    InvalidSpeedUpFactor(f32),
    #[error("sped-up delay of {seconds_per_character}s / {speed_up_factor} is out of range")]
    DelayOutOfRange {
        seconds_per_character: f32,
        speed_up_factor: f32,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Reveal timing. Fixed once an animator is built from it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawRevealConfig")]
pub struct RevealConfig {
    seconds_per_character: f32,
    speed_up_factor: f32,
}

// RON shape, with defaults filled in before validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawRevealConfig {
    seconds_per_character: f32,
    speed_up_factor: f32,
}

impl Default for RawRevealConfig {
    fn default() -> Self {
        Self {
            seconds_per_character: 0.1,
            speed_up_factor: 2.0,
        }
    }
}

impl TryFrom<RawRevealConfig> for RevealConfig {
    type Error = ConfigError;

    fn try_from(raw: RawRevealConfig) -> Result<Self, Self::Error> {
        RevealConfig::new(raw.seconds_per_character, raw.speed_up_factor)
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        let raw = RawRevealConfig::default();
        Self {
            seconds_per_character: raw.seconds_per_character,
            speed_up_factor: raw.speed_up_factor,
        }
    }
}

impl RevealConfig {
    pub fn new(seconds_per_character: f32, speed_up_factor: f32) -> Result<Self, ConfigError> {
        if !(seconds_per_character.is_finite() && seconds_per_character > 0.0) {
            return Err(ConfigError::InvalidSecondsPerCharacter(seconds_per_character));
        }
        if !(speed_up_factor.is_finite() && speed_up_factor > 0.0) {
            return Err(ConfigError::InvalidSpeedUpFactor(speed_up_factor));
        }
        let out_of_range = ConfigError::DelayOutOfRange {
            seconds_per_character,
            speed_up_factor,
        };
        match (
            Duration::try_from_secs_f32(seconds_per_character),
            Duration::try_from_secs_f32(seconds_per_character / speed_up_factor),
        ) {
            (Ok(_), Ok(_)) => Ok(Self {
                seconds_per_character,
                speed_up_factor,
            }),
            _ => Err(out_of_range),
        }
    }

    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load_from_ron(path: &Path) -> Result<RevealConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<RevealConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn seconds_per_character(&self) -> f32 {
        self.seconds_per_character
    }

    pub fn speed_up_factor(&self) -> f32 {
        self.speed_up_factor
    }

    /// Delay between characters at normal speed.
    pub fn character_delay(&self) -> Duration {
        Duration::from_secs_f32(self.seconds_per_character)
    }

    /// Delay between characters once the reveal has been sped up.
    pub fn sped_up_delay(&self) -> Duration {
        Duration::from_secs_f32(self.seconds_per_character / self.speed_up_factor)
    }
}

/// Progress of the current reveal.
///
/// `revealed_count <= total_characters` always holds, and `active` is false
/// exactly when the reveal has finished or was never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealState {
    pub total_characters: usize,
    pub revealed_count: usize,
    pub sped_up: bool,
    pub active: bool,
}

/// Reveals one text at a time; starting a new one replaces the old.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    config: RevealConfig,
    base_delay: Duration,
    sped_up_delay: Duration,
    text: String,
    state: RevealState,
    elapsed: Duration,
}

impl RevealAnimator {
    pub fn new(config: RevealConfig) -> Self {
        let base_delay = config.character_delay();
        Self {
            config,
            base_delay,
            sped_up_delay: config.sped_up_delay(),
            text: String::new(),
            state: RevealState::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Begin revealing `text`, cancelling whatever reveal was running.
    ///
    /// The surface receives the full text and a visible count of zero. An
    /// empty text finishes immediately.
    pub fn start<S>(&mut self, text: &str, surface: &mut S)
    where
        S: PresentationSurface + ?Sized,
    {
        self.cancel();

        self.text.clear();
        self.text.push_str(text);
        let total_characters = text.chars().count();
        self.state = RevealState {
            total_characters,
            revealed_count: 0,
            sped_up: false,
            active: total_characters > 0,
        };
        self.elapsed = Duration::ZERO;

        surface.set_text(text);
        surface.set_visible_character_count(0);
        tracing::trace!(characters = total_characters, "reveal started");
    }

    /// Reveal the current text again from the beginning.
    pub fn restart<S>(&mut self, surface: &mut S)
    where
        S: PresentationSurface + ?Sized,
    {
        let text = std::mem::take(&mut self.text);
        self.start(&text, surface);
    }

    /// Stop the running reveal without finishing it. The animator returns
    /// to its never-started state.
    pub fn cancel(&mut self) {
        if self.state.active {
            tracing::trace!(
                revealed = self.state.revealed_count,
                total = self.state.total_characters,
                "reveal cancelled"
            );
        }
        self.state = RevealState::default();
        self.elapsed = Duration::ZERO;
    }

    /// Use the sped-up delay for every remaining character, including the
    /// one currently being waited on. No effect when nothing is playing.
    pub fn request_speed_up(&mut self) {
        if self.state.active && !self.state.sped_up {
            self.state.sped_up = true;
            tracing::trace!(revealed = self.state.revealed_count, "reveal sped up");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.active
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// The text currently (or most recently) being revealed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Advance by `dt`. Reveals at most one character per call, once the
    /// current delay has elapsed; time beyond the delay is discarded.
    /// Returns whether a character was revealed.
    pub fn advance<S>(&mut self, dt: Duration, surface: &mut S) -> bool
    where
        S: PresentationSurface + ?Sized,
    {
        if !self.state.active {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        let delay = if self.state.sped_up {
            self.sped_up_delay
        } else {
            self.base_delay
        };
        if self.elapsed < delay {
            return false;
        }
        self.elapsed = Duration::ZERO;

        self.state.revealed_count += 1;
        surface.set_visible_character_count(self.state.revealed_count);

        if self.state.revealed_count >= self.state.total_characters {
            self.state.active = false;
            tracing::trace!(characters = self.state.total_characters, "reveal finished");
        }
        true
    }
}
