//! Parameter handlers and the chat sink they publish to.
//!
//! A handler reacts to avatar parameter changes. It never reads the clock:
//! the dispatcher passes the receive time in with every change.

pub mod heart_rate;
pub mod tail_grab;
pub mod value;

pub use heart_rate::HeartRateMoodHandler;
pub use tail_grab::TailGrabHandler;
pub use value::ParamValue;

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Destination for chatbox text.
///
/// Delivery is fire-and-forget; a sink deals with its own failures.
pub trait ChatSink {
    fn send_to_chat(&self, text: &str);
}

impl<T: ChatSink + ?Sized> ChatSink for Arc<T> {
    fn send_to_chat(&self, text: &str) {
        (**self).send_to_chat(text)
    }
}

impl<T: ChatSink + ?Sized> ChatSink for &T {
    fn send_to_chat(&self, text: &str) {
        (**self).send_to_chat(text)
    }
}

/// Reacts to avatar parameter changes.
pub trait ParameterHandler {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handle one changed parameter received at `now`.
    fn on_parameter_changed(&mut self, parameter: &str, value: &ParamValue, now: DateTime<Utc>);
}

/// Chat sink that keeps every line in memory.
///
/// Clones share the same buffer, so one copy can be handed to a handler and
/// another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines sent so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<String> {
        self.messages.lock().ok().and_then(|m| m.last().cloned())
    }

    /// Remove and return all buffered lines.
    pub fn drain(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }
}

impl ChatSink for MemorySink {
    fn send_to_chat(&self, text: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
    }
}
