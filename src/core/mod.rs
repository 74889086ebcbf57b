pub mod reveal;
pub mod sequencer;
pub mod signal;
pub mod surface;
