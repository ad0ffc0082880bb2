//! Debounce / hysteresis for mood changes.
//!
//! A new zone only becomes the published mood after it has been the candidate
//! for an uninterrupted dwell period. Transient alerts skip the dwell
//! entirely and leave the published mood untouched.

use crate::core::announcement::{Announcement, Direction};
use crate::core::mood::{Label, Mood};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Default dwell before a new zone is accepted.
pub const DEFAULT_STABILISATION_SECS: i64 = 10;

/// A zone waiting out its dwell time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMood {
    pub mood: Mood,
    pub first_seen: DateTime<Utc>,
}

/// Hysteresis state machine over candidate labels.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Last published mood, `None` until the first sample
    current: Option<Mood>,
    /// Candidate zone and when it was first seen
    pending: Option<PendingMood>,
    /// Minimum dwell before committing
    stabilisation: Duration,
}

impl Debouncer {
    /// Create a debouncer requiring `stabilisation` of dwell.
    pub fn new(stabilisation: Duration) -> Self {
        Self {
            current: None,
            pending: None,
            stabilisation,
        }
    }

    /// The committed mood.
    pub fn current(&self) -> Option<Mood> {
        self.current
    }

    /// Candidate waiting to be committed.
    pub fn pending(&self) -> Option<&PendingMood> {
        self.pending.as_ref()
    }

    /// Feed one candidate label. `bpm` is the sample that produced it.
    pub fn observe(&mut self, candidate: Label, bpm: f64, now: DateTime<Utc>) -> Option<Announcement> {
        let mood = match candidate {
            Label::Transient(alert) => return Some(Announcement::Transient { alert }),
            Label::Zone(mood) => mood,
        };

        let Some(current) = self.current else {
            self.current = Some(mood);
            return Some(Announcement::Initial { mood });
        };

        if mood == current {
            self.pending = None;
            return None;
        }

        match self.pending {
            Some(pending) if pending.mood == mood => {
                if now - pending.first_seen < self.stabilisation {
                    return None;
                }
                self.current = Some(mood);
                self.pending = None;
                debug!(from = %current, to = %mood, "Mood changed after stabilisation");
                Some(Announcement::MoodChanged {
                    direction: Direction::between(current, mood),
                    bpm,
                    mood,
                })
            }
            _ => {
                debug!(candidate = %mood, "Mood candidate detected; waiting for stability");
                self.pending = Some(PendingMood {
                    mood,
                    first_seen: now,
                });
                None
            }
        }
    }

    /// Forget the published mood and any pending candidate.
    pub fn reset(&mut self) {
        self.current = None;
        self.pending = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STABILISATION_SECS))
    }
}
