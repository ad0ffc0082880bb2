//! Typed chat announcements.

use crate::core::mood::{Mood, TransientAlert};
use std::fmt;

/// Direction of a committed mood change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` when `to` outranks `from`, `Down` otherwise.
    pub fn between(from: Mood, to: Mood) -> Self {
        if to > from {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Arrow shown in chat.
    pub fn marker(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

/// Something worth telling the chat about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Announcement {
    /// First mood ever published
    Initial { mood: Mood },
    /// Abrupt change, published without debouncing
    Transient { alert: TransientAlert },
    /// Debounced mood change
    MoodChanged {
        direction: Direction,
        bpm: f64,
        mood: Mood,
    },
    /// Large jump inside the current mood
    Delta { mood: Mood, from: f64, to: f64 },
}

impl Announcement {
    /// Chat line for this announcement with `prefix` prepended.
    pub fn render(&self, prefix: &str) -> String {
        format!("{prefix}{self}")
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::Initial { mood } => write!(f, "{mood}"),
            Announcement::Transient { alert } => write!(f, "{alert}"),
            Announcement::MoodChanged {
                direction,
                bpm,
                mood,
            } => write!(f, "{} {bpm:.0} - {mood}", direction.marker()),
            Announcement::Delta { mood, from, to } => write!(f, "{mood} ({from:.0} -> {to:.0})"),
        }
    }
}
