/// Dialogue Linter — validates dialogue files before they ship.
///
/// Usage: dialogue_linter <dialogue_dir|file.ron> [--config <reveal.ron>] [--max-chars <n>]

use dialogue_player::core::reveal::RevealConfig;
use dialogue_player::schema::dialogue::Dialogue;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_MAX_CHARS: usize = 280;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: dialogue_linter <dialogue_dir|file.ron> [--config <reveal.ron>] [--max-chars <n>]");
        process::exit(0);
    }

    let target = PathBuf::from(&args[1]);
    let mut config_path = None;
    let mut max_chars = DEFAULT_MAX_CHARS;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--max-chars" if i + 1 < args.len() => {
                i += 1;
                max_chars = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --max-chars must be a positive integer");
                    process::exit(1);
                });
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => RevealConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load reveal config '{}': {}", path, e);
            process::exit(1);
        }),
        None => RevealConfig::default(),
    };

    let mut files = Vec::new();
    if target.is_file() {
        files.push(target.clone());
    } else if target.is_dir() {
        collect_ron_files(&target, &mut files);
        files.sort();
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target.display());
        process::exit(1);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    println!("\n=== Dialogue Lint Report ===\n");

    for path in &files {
        match Dialogue::load_from_ron(path) {
            Ok(dialogue) => {
                let estimate = dialogue.estimated_duration(&config);
                println!(
                    "  {}: {} beats, ~{:.1}s of reveal",
                    path.display(),
                    dialogue.len(),
                    estimate.as_secs_f32()
                );
                let (e, w) = lint_dialogue(&path.display().to_string(), &dialogue, max_chars);
                errors.extend(e);
                warnings.extend(w);
            }
            Err(e) => errors.push(format!("{}: failed to load: {}", path.display(), e)),
        }
    }

    println!();
    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
}

fn lint_dialogue(name: &str, dialogue: &Dialogue, max_chars: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if dialogue.is_empty() {
        warnings.push(format!("{}: dialogue has no beats", name));
    }

    for (index, beat) in dialogue.beats().iter().enumerate() {
        if beat.speaker_name().trim().is_empty() {
            errors.push(format!("{}: beat {} has no speaker", name, index));
        }

        let text = beat.text();
        if text.trim().is_empty() {
            errors.push(format!("{}: beat {} has no text", name, index));
        } else if text.trim() != text {
            warnings.push(format!(
                "{}: beat {} has leading or trailing whitespace that will be revealed",
                name, index
            ));
        }

        let count = beat.character_count();
        if count > max_chars {
            warnings.push(format!(
                "{}: beat {} is {} characters (limit {})",
                name, index, count, max_chars
            ));
        }
    }

    (errors, warnings)
}
