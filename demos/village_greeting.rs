/// Village Greeting example — scripted playback of a short exchange.
///
/// Simulates a 60 fps host loop in which the player presses continue as
/// soon as each line is fully shown, and once holds the button down to
/// hurry a long line along.
///
/// Run with: cargo run --example village_greeting

use dialogue_player::core::reveal::RevealConfig;
use dialogue_player::core::sequencer::{DialoguePlayer, Phase, PlaybackEvent};
use dialogue_player::core::signal::PulseSignal;
use dialogue_player::core::surface::TextSurface;
use dialogue_player::schema::beat::Beat;
use dialogue_player::schema::dialogue::Dialogue;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let dialogue: Dialogue = [
        ("Elder", "Welcome, traveler."),
        ("Traveler", "Thank you. Is there an inn nearby?"),
        (
            "Elder",
            "Past the mill, over the old stone bridge, and up the hill where the lanterns are always lit.",
        ),
        ("Traveler", "Much obliged."),
    ]
    .iter()
    .map(|(speaker, text)| Beat::new(*speaker, *text))
    .collect();
    let dialogue = Arc::new(dialogue);

    let config = RevealConfig::new(0.04, 4.0).expect("valid reveal timing");
    let frame = Duration::from_millis(16);

    println!(
        "--- Village Greeting ({} beats, ~{:.1}s of text at normal speed) ---\n",
        dialogue.len(),
        dialogue.estimated_duration(&config).as_secs_f32()
    );

    let pulse = PulseSignal::new();
    let mut player = DialoguePlayer::new(config, TextSurface::new());
    player.set_continue_signal(Some(Box::new(pulse.clone())));

    player
        .play(Arc::clone(&dialogue))
        .expect("dialogue is present");

    let mut frames = 0u32;
    let mut beat_frames = 0u32;
    while player.phase() != Phase::Done {
        frames += 1;
        beat_frames += 1;

        // Hold continue on the long third line once it is underway.
        let index = player.state().current_beat_index.unwrap_or(0);
        if index == 2 && player.phase() == Phase::Revealing && beat_frames > 10 {
            pulse.pulse();
        }
        if player.phase() == Phase::AwaitingContinue {
            pulse.pulse();
        }

        match player.tick(frame) {
            Some(PlaybackEvent::RevealFinished { index }) => {
                let surface = player.surface();
                let sped = if player.reveal().state().sped_up {
                    " (sped up)"
                } else {
                    ""
                };
                println!(
                    "[beat {} after {} frames{}] {}: {}",
                    index,
                    beat_frames,
                    sped,
                    surface.speaker_name(),
                    surface.visible_text()
                );
            }
            Some(PlaybackEvent::BeatStarted { .. }) => beat_frames = 0,
            Some(PlaybackEvent::Finished) => {
                println!("\n--- Finished after {} frames ---", frames);
            }
            _ => {}
        }
    }

    assert!(!player.surface().is_visible());
}
