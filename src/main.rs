//! koe main entry point
//!
//! The driver loop reads batches of text from the user, sends each
//! line to the synthesis API, and queues the resulting audio files for
//! background playback while the user keeps typing.

use koe::config::Config;
use koe::input::{self, Batch, EXIT_KEYWORD};
use koe::playback::{PlaybackJob, PlaybackManager, RodioOutput};
use koe::speech::{Synthesizer, VoiceConfig, CREDENTIAL_VAR, KNOWN_VOICES};
use koe::{KoeError, Result};
use log::{debug, error, info, warn};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Courtesy delay between synthesis calls in a multi-line batch
const BATCH_DELAY: Duration = Duration::from_millis(500);

/// Global flag set by the SIGINT handler
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// SIGINT handler - requests a clean exit from the driver loop
extern "C" fn handle_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // Initialize logger
    if debug_mode {
        // Debug mode: write to koe.log file
        use std::fs::OpenOptions;
        match OpenOptions::new().create(true).append(true).open("koe.log") {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open koe.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "koe version {} starting (debug mode, logging to koe.log)",
            koe::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    // Run the application
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    debug!("Initializing koe");

    // Load configuration
    let config = Config::load()?;
    info!("Config loaded from {:?}", config.path());

    // Resolve the API credential before anything else; without it no
    // synthesis call can succeed.
    let synth = match Synthesizer::from_env(config.model(), config.output_dir()) {
        Ok(synth) => synth,
        Err(e @ KoeError::MissingCredential(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("Set the environment variable with your API key:");
            eprintln!("  export {}='your-api-key'", CREDENTIAL_VAR);
            process::exit(1);
        }
        Err(e) => return Err(e),
    };

    // Playback worker is spawned lazily on the first enqueue
    let playback = PlaybackManager::new(RodioOutput::factory());

    // Voice settings for the session, seeded from config
    let mut voice = VoiceConfig::new(config.voice(), config.instructions());

    // Set up signal handler so Ctrl+C exits the loop cleanly
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_sigint))
            .map_err(|e| KoeError::Other(format!("Failed to set SIGINT handler: {}", e)))?;
    }

    println!("koe {} - queued text to speech", koe::VERSION);
    println!("Available voices: {}", KNOWN_VOICES.join(", "));
    println!(
        "Enter lines of text; a blank line sends the batch. Type '{}' to quit.",
        EXIT_KEYWORD
    );

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    // Main driver loop
    loop {
        show_settings(&voice);
        println!("Text:");

        let batch = match input::read_batch(&mut reader, &INTERRUPTED) {
            Ok(batch) => batch,
            Err(KoeError::Interrupted) => {
                println!();
                info!("Interrupted by user");
                println!("Interrupted.");
                break;
            }
            Err(e) => return Err(e),
        };

        match batch {
            Batch::Exit => {
                println!("Goodbye.");
                break;
            }
            Batch::Lines(lines) => {
                maybe_update_settings(&mut reader, &mut voice)?;
                process_lines(&synth, &playback, &lines, &voice);
            }
        }
    }

    Ok(())
}

/// Show current voice settings before each batch
fn show_settings(voice: &VoiceConfig) {
    println!();
    println!("Voice: {}", voice.voice);
    println!("Style: {}", voice.instructions);
}

/// Offer to change voice and style between batches
fn maybe_update_settings(reader: &mut impl BufRead, voice: &mut VoiceConfig) -> Result<()> {
    print!("Change voice or style? [y/N]: ");
    io::stdout().flush()?;
    let answer = input::read_response(reader)?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(());
    }

    print!("Voice (currently {}): ", voice.voice);
    io::stdout().flush()?;
    let new_voice = input::read_response(reader)?;
    if !new_voice.is_empty() && !VoiceConfig::is_known_voice(&new_voice) {
        warn!("Unknown voice '{}', sending it anyway", new_voice);
    }
    voice.update_voice(&new_voice);

    print!("Style instructions (blank keeps current): ");
    io::stdout().flush()?;
    let new_instructions = input::read_response(reader)?;
    voice.update_instructions(&new_instructions);

    Ok(())
}

/// Synthesize each line in order, queueing successful results
fn process_lines(
    synth: &Synthesizer,
    playback: &PlaybackManager,
    lines: &[String],
    voice: &VoiceConfig,
) {
    if lines.len() > 1 {
        println!("Processing {} lines...", lines.len());
    }

    for (i, line) in lines.iter().enumerate() {
        if INTERRUPTED.load(Ordering::Relaxed) {
            break;
        }
        synthesize_and_queue(synth, playback, line, voice);

        // Courtesy pause between consecutive API calls
        if lines.len() > 1 && i + 1 < lines.len() {
            thread::sleep(BATCH_DELAY);
        }
    }
}

/// One synthesis call; on success the audio is queued for playback
///
/// Failures are logged and swallowed so the loop keeps accepting
/// input; only presence or absence of a path crosses this boundary.
fn synthesize_and_queue(
    synth: &Synthesizer,
    playback: &PlaybackManager,
    text: &str,
    voice: &VoiceConfig,
) -> Option<PathBuf> {
    match synth.synthesize(text, &voice.voice, &voice.instructions) {
        Ok(path) => {
            println!("Saved speech to {}", path.display());
            playback.enqueue(PlaybackJob::new(path.clone(), text));
            Some(path)
        }
        Err(e) => {
            error!("Synthesis failed: {}", e);
            None
        }
    }
}
