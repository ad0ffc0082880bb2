//! Heart-Rate Mood Agent CLI
//!
//! Publishes heart-rate moods to the VRChat chatbox.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use clap::{Parser, Subcommand};
use heartrate_mood_agent::{
    config::Config,
    core::MOOD_CATALOGUE,
    dispatch::{ParameterDispatcher, ParameterUpdate},
    handler::{ChatSink, HeartRateMoodHandler, ParamValue},
    osc::{OscReceiver, OscSender},
    VERSION,
};
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hr-mood")]
#[command(version = VERSION)]
#[command(about = "Heart-rate driven chatbox moods for VRChat", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for OSC parameters and publish moods
    Run {
        /// Also shock on tail release (requires shock feature)
        #[arg(long)]
        shock: bool,
    },

    /// Feed recorded samples through the classifier and print chat lines
    Replay {
        /// JSON lines file of {"t": seconds, "value": raw}
        file: PathBuf,
    },

    /// Print the mood catalogue
    Moods,

    /// Show configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { shock } => {
            cmd_run(shock);
        }
        Commands::Replay { file } => {
            cmd_replay(&file);
        }
        Commands::Moods => {
            cmd_moods();
        }
        Commands::Config { init } => {
            cmd_config(init);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config, using defaults: {e}");
            Config::default()
        }
    }
}

fn cmd_run(enable_shock: bool) {
    println!("Heart-Rate Mood Agent v{VERSION}");
    println!();

    let config = load_config();

    let sender = match OscSender::new(config.osc_send_addr) {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            eprintln!("Error creating OSC sender: {e}");
            std::process::exit(1);
        }
    };
    let receiver = match OscReceiver::bind(config.osc_receive_addr) {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("Error binding {}: {e}", config.osc_receive_addr);
            std::process::exit(1);
        }
    };

    println!("  Listening on: {}", config.osc_receive_addr);
    println!("  Sending to: {}", config.osc_send_addr);
    println!("  Heart-rate parameter: {}", config.heart_rate.parameter);

    let mut dispatcher = ParameterDispatcher::new();
    dispatcher.add_handler(Box::new(HeartRateMoodHandler::new(
        sender.clone(),
        &config.heart_rate,
        &config.classifier,
    )));

    let enable_shock = enable_shock || config.shock.enabled;

    #[cfg(feature = "shock")]
    if enable_shock {
        match heartrate_mood_agent::BlockingPiShockClient::from_env() {
            Ok(client) => {
                println!("  Tail shock: enabled ({})", config.shock.grabbed_parameter());
                dispatcher.add_handler(Box::new(heartrate_mood_agent::TailGrabHandler::new(
                    client,
                    sender.clone(),
                    &config.shock,
                )));
            }
            Err(e) => {
                eprintln!("Warning: Tail shock disabled: {e}");
            }
        }
    }
    #[cfg(not(feature = "shock"))]
    if enable_shock {
        eprintln!("Warning: --shock flag ignored (shock feature not enabled at compile time)");
    }

    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let (tx, rx) = crossbeam_channel::bounded::<ParameterUpdate>(1_000);
    let receiver_thread = match receiver.spawn(tx, running.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error starting OSC receiver: {e}");
            std::process::exit(1);
        }
    };

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(update) => {
                dispatcher.dispatch(&update, Utc::now());
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("OSC receiver disconnected unexpectedly");
                break;
            }
        }
    }

    println!();
    println!("Shutting down");
    running.store(false, Ordering::SeqCst);
    if receiver_thread.join().is_err() {
        eprintln!("Warning: OSC receiver thread panicked");
    }
}

/// One recorded sample in a replay file.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    /// Seconds since the start of the recording
    t: f64,
    value: ParamValue,
    /// Defaults to the configured heart-rate parameter
    parameter: Option<String>,
}

/// Prints chat lines to stdout.
struct StdoutSink;

impl ChatSink for StdoutSink {
    fn send_to_chat(&self, text: &str) {
        println!("  chat: {text}");
    }
}

fn cmd_replay(file: &PathBuf) {
    let config = load_config();

    let reader = match std::fs::File::open(file) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("Error opening {file:?}: {e}");
            std::process::exit(1);
        }
    };

    let mut handler = HeartRateMoodHandler::new(StdoutSink, &config.heart_rate, &config.classifier);
    let start = Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now);
    let mut samples = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading {file:?}: {e}");
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let record: ReplayRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Warning: Skipping line {}: {e}", line_no + 1);
                continue;
            }
        };

        let now = start + ChronoDuration::milliseconds((record.t * 1000.0) as i64);
        let parameter = record
            .parameter
            .unwrap_or_else(|| config.heart_rate.parameter.clone());

        println!("[{:>7.1}s] {parameter} = {}", record.t, record.value);
        if handler.ingest(&parameter, &record.value, now).is_some() {
            samples += 1;
        }
    }

    println!();
    println!("Replayed {samples} samples");
    if let Some(mood) = handler.classifier().current_mood() {
        println!("Final mood: {mood}");
    }
}

fn cmd_moods() {
    println!("Mood Catalogue");
    println!("==============");
    println!();
    for zone in MOOD_CATALOGUE.iter() {
        let start = zone
            .start
            .map(|s| format!("{s}"))
            .unwrap_or_else(|| "-inf".to_string());
        let end = zone
            .end
            .map(|e| format!("{e}"))
            .unwrap_or_else(|| "inf".to_string());
        println!(
            "  {}. {:<14} [{start}, {end}) bpm",
            zone.rank,
            zone.mood.name()
        );
    }
}

fn cmd_config(init: bool) {
    // A file that fails to parse is left alone rather than replaced by defaults
    if init {
        if let Err(e) = Config::load().and_then(|config| config.save()) {
            eprintln!("Error writing config: {e}");
            std::process::exit(1);
        }
        println!("Wrote {:?}", Config::config_path());
        println!();
    }

    let config = load_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
