/// The continue signal: the host's "the player wants to advance" query.

use std::cell::Cell;
use std::rc::Rc;

/// Queried by the player at most once per tick.
///
/// While a beat is revealing, `true` speeds the reveal up. Once the beat
/// is fully shown, `true` moves on to the next beat.
pub trait ContinueSignal {
    fn should_continue(&mut self) -> bool;
}

impl<F> ContinueSignal for F
where
    F: FnMut() -> bool,
{
    fn should_continue(&mut self) -> bool {
        self()
    }
}

/// A consume-on-read latch.
///
/// The host's input layer calls [`PulseSignal::pulse`] when a key or click
/// arrives; the next query returns `true` once and clears the latch. Clones
/// share the same latch, so one handle can be given to the player while the
/// host keeps another.
#[derive(Debug, Clone, Default)]
pub struct PulseSignal {
    pending: Rc<Cell<bool>>,
}

impl PulseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulse(&self) {
        self.pending.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

impl ContinueSignal for PulseSignal {
    fn should_continue(&mut self) -> bool {
        self.pending.replace(false)
    }
}
