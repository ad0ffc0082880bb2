//! Heart-Rate Mood Agent - chatbox moods from a live heart rate.
//!
//! This library turns a noisy, periodically sampled heart rate into a small
//! set of human-readable moods and publishes them to the VRChat chatbox over
//! OSC.
//!
//! # Behaviour
//!
//! - **Zones**: every sample falls into exactly one mood zone
//! - **Debounce**: a new zone is only announced after it held for 10 seconds
//! - **Fast path**: abrupt rises and falls are announced immediately as
//!   "excited" / "calming" without touching the published mood
//! - **Jumps**: large sample-to-sample jumps are reported once per excursion
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Heart-Rate Mood Agent                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │ OscReceiver │──▶│ Dispatcher  │──▶│  Handlers   │       │
//! │  │   (UDP)     │   │ (changes)   │   │ (HR, tail)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                              │              │
//! │                                              ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐       │
//! │  │  OscSender  │◀────────────────────│   Mood      │       │
//! │  │  (chatbox)  │                     │ Classifier  │       │
//! │  └─────────────┘                     └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use heartrate_mood_agent::handler::{HeartRateMoodHandler, MemorySink, ParamValue};
//!
//! let sink = MemorySink::new();
//! let mut handler = HeartRateMoodHandler::with_defaults(sink.clone());
//!
//! // 0.36 * 250 = 90 bpm
//! handler.ingest("Normalised", &ParamValue::Float(0.36), Utc::now());
//! assert_eq!(sink.last().as_deref(), Some("♡ normal"));
//! ```

pub mod config;
pub mod core;
pub mod dispatch;
pub mod handler;
pub mod osc;
pub mod shock;

// Re-export key types at crate root for convenience
pub use config::{ClassifierConfig, Config, ConfigError, HeartRateConfig, ShockConfig};
pub use crate::core::{Announcement, Label, Mood, MoodClassifier, TransientAlert};
pub use dispatch::{ParameterDispatcher, ParameterUpdate};
pub use handler::{
    ChatSink, HeartRateMoodHandler, MemorySink, ParamValue, ParameterHandler, TailGrabHandler,
};
pub use osc::{OscReceiver, OscSender};
pub use shock::{CooldownGuard, ShockCommand, ShockError, ShockTransport, Shocker};

#[cfg(feature = "shock")]
pub use shock::{BlockingPiShockClient, PiShockCredentials};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
