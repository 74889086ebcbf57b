/// Preview — plays a dialogue file in the terminal.
///
/// Usage: preview <dialogue.ron> [--config <reveal.ron>] [--seconds-per-char <s>] [--auto <s>]
///
/// Press Enter to speed up the current line, and again to continue once it
/// is fully shown. With `--auto`, continue fires by itself after the given
/// pause on each finished line.

use dialogue_player::core::sequencer::{DialoguePlayerBuilder, Phase, PlaybackEvent};
use dialogue_player::core::surface::TextSurface;
use dialogue_player::schema::dialogue::Dialogue;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let dialogue_path = args[1].clone();
    let mut config_path = None;
    let mut seconds_per_char = None;
    let mut auto_pause = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seconds-per-char" if i + 1 < args.len() => {
                i += 1;
                seconds_per_char = Some(parse_seconds(&args[i]));
            }
            "--auto" if i + 1 < args.len() => {
                i += 1;
                auto_pause = Some(Duration::from_secs_f32(parse_seconds(&args[i])));
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let dialogue = Dialogue::load_from_ron(Path::new(&dialogue_path)).unwrap_or_else(|e| {
        eprintln!("Error loading dialogue '{}': {}", dialogue_path, e);
        std::process::exit(1);
    });

    // Enter presses arrive from a reader thread; the player polls them.
    let (tx, rx) = mpsc::channel::<()>();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    let auto_fire = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let auto_flag = Arc::clone(&auto_fire);
    let signal = move || {
        let pressed = rx.try_recv().is_ok();
        pressed || auto_flag.swap(false, std::sync::atomic::Ordering::Relaxed)
    };

    let mut builder = DialoguePlayerBuilder::new().continue_signal(signal);
    if let Some(ref path) = config_path {
        builder = builder.config_file(path);
    }
    if let Some(seconds) = seconds_per_char {
        builder = builder.seconds_per_character(seconds);
    }
    let mut player = builder.build(TextSurface::new()).unwrap_or_else(|e| {
        eprintln!("Error building player: {}", e);
        std::process::exit(1);
    });

    println!(
        "Playing '{}' ({} beats, ~{:.1}s of text). Enter to continue.\n",
        dialogue_path,
        dialogue.len(),
        dialogue.estimated_duration(player.config()).as_secs_f32()
    );

    if let Err(e) = player.play(Arc::new(dialogue)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut stdout = io::stdout();
    let mut last_frame = Instant::now();
    let mut waiting_since = None;
    let mut drawn = String::new();

    while player.phase() != Phase::Done {
        std::thread::sleep(FRAME);
        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;

        if let Some(PlaybackEvent::BeatStarted { .. }) = player.tick(dt) {
            println!();
            drawn.clear();
        }
        // Empty beats skip RevealFinished, so track the phase instead.
        if player.phase() != Phase::AwaitingContinue {
            waiting_since = None;
        } else if waiting_since.is_none() {
            waiting_since = Some(now);
        }

        if let (Some(pause), Some(since)) = (auto_pause, waiting_since) {
            if player.phase() == Phase::AwaitingContinue && now - since >= pause {
                auto_fire.store(true, std::sync::atomic::Ordering::Relaxed);
                waiting_since = None;
            }
        }

        let line = render(player.surface());
        if line != drawn {
            print!("\r\x1b[2K{}", line);
            stdout.flush().ok();
            drawn = line;
        }
    }

    println!("\n\n[end of dialogue]");
}

fn render(surface: &TextSurface) -> String {
    let prompt = if surface.is_continue_prompt_visible() {
        " [Enter]"
    } else {
        ""
    };
    format!(
        "{}: {}{}",
        surface.speaker_name(),
        surface.visible_text(),
        prompt
    )
}

fn parse_seconds(value: &str) -> f32 {
    match value.parse::<f32>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        _ => {
            eprintln!("Error: expected a positive number of seconds, got '{}'", value);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Preview — plays a dialogue file in the terminal");
    println!();
    println!("Usage: preview <dialogue.ron> [options]");
    println!();
    println!("Options:");
    println!("  --config <reveal.ron>       Reveal timing config");
    println!("  --seconds-per-char <s>      Override delay between characters");
    println!("  --auto <s>                  Continue automatically after <s> seconds");
}
