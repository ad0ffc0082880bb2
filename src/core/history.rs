//! Bounded sample history.
//!
//! Heart-rate samples are kept in a fixed-capacity ring buffer. Storage is
//! allocated once at construction; when the buffer is full the oldest sample
//! is overwritten.

use chrono::{DateTime, Duration, Utc};

/// Default number of samples kept (~3 minutes at 1 Hz).
pub const DEFAULT_HISTORY_CAPACITY: usize = 180;

/// A single heart-rate observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the sample was received
    pub timestamp: DateTime<Utc>,
    /// Heart rate in beats per minute
    pub bpm: f64,
}

impl Sample {
    /// Create a sample.
    pub fn new(timestamp: DateTime<Utc>, bpm: f64) -> Self {
        Self { timestamp, bpm }
    }
}

/// Insertion-ordered ring buffer of samples.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    /// Backing storage, never grows past `capacity`
    slots: Vec<Sample>,
    /// Index of the oldest sample once the buffer has wrapped
    head: usize,
    /// Number of live samples
    len: usize,
    capacity: usize,
}

impl SampleHistory {
    /// Create an empty history holding at most `capacity` samples.
    ///
    /// A capacity of zero is bumped to one so the newest sample is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            len: 0,
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the buffer is full.
    pub fn record(&mut self, timestamp: DateTime<Utc>, bpm: f64) {
        let sample = Sample::new(timestamp, bpm);

        if self.slots.len() < self.capacity {
            self.slots.push(sample);
            self.len += 1;
            return;
        }

        self.slots[self.head] = sample;
        self.head = (self.head + 1) % self.capacity;
    }

    /// Sample at logical position `index` (0 = oldest).
    fn get(&self, index: usize) -> Option<&Sample> {
        if index >= self.len {
            return None;
        }
        self.slots.get((self.head + index) % self.capacity)
    }

    /// The most recently recorded sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// The sample recorded just before the latest one.
    pub fn previous(&self) -> Option<&Sample> {
        self.len.checked_sub(2).and_then(|i| self.get(i))
    }

    /// Iterate over all samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// BPM values recorded at or after `now - duration`, oldest first.
    ///
    /// With `exclude_newest` the most recent sample is skipped, so callers can
    /// look at the context preceding the value being classified.
    pub fn window(
        &self,
        now: DateTime<Utc>,
        duration: Duration,
        exclude_newest: bool,
    ) -> impl Iterator<Item = f64> + '_ {
        let cutoff = now - duration;
        let end = if exclude_newest {
            self.len.saturating_sub(1)
        } else {
            self.len
        };

        (0..end)
            .filter_map(move |i| self.get(i))
            .filter(move |s| s.timestamp >= cutoff)
            .map(|s| s.bpm)
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every sample. Storage is retained for reuse.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.len = 0;
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
