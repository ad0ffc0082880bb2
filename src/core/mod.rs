//! Core functionality for the heart-rate mood agent.
//!
//! This module contains:
//! - Bounded sample history and the rolling median baseline
//! - Mood catalogue and candidate classification
//! - Debounce of mood changes and significant-jump notifications

pub mod announcement;
pub mod baseline;
pub mod candidate;
pub mod debounce;
pub mod engine;
pub mod history;
pub mod mood;
pub mod notify;

// Re-export commonly used types
pub use announcement::{Announcement, Direction};
pub use candidate::{classify, CandidateThresholds};
pub use debounce::{Debouncer, PendingMood};
pub use engine::{Classification, MoodClassifier};
pub use history::{Sample, SampleHistory};
pub use mood::{Label, Mood, MoodZone, TransientAlert, MOOD_CATALOGUE};
pub use notify::DeltaNotifier;
