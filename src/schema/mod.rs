pub mod beat;
pub mod dialogue;
