//! Significant-jump notifications.
//!
//! Large sample-to-sample jumps are reported even when the published mood
//! stays the same. The last reported BPM is remembered so a sustained
//! excursion is only announced once.

use crate::core::announcement::Announcement;
use crate::core::mood::Mood;

/// Default jump (BPM) that triggers a notification.
pub const DEFAULT_SIGNIFICANT_DELTA_BPM: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct DeltaNotifier {
    threshold: f64,
    last_notified_bpm: Option<f64>,
}

impl DeltaNotifier {
    /// Create a notifier firing on jumps of at least `threshold` BPM.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_notified_bpm: None,
        }
    }

    /// BPM of the last notification.
    pub fn last_notified_bpm(&self) -> Option<f64> {
        self.last_notified_bpm
    }

    /// Check the latest sample against the previous one.
    pub fn observe(
        &mut self,
        current: Option<Mood>,
        previous_bpm: Option<f64>,
        bpm: f64,
    ) -> Option<Announcement> {
        let mood = current?;
        let previous = previous_bpm?;

        if (bpm - previous).abs() < self.threshold {
            return None;
        }
        if let Some(last) = self.last_notified_bpm {
            if (bpm - last).abs() < self.threshold {
                return None;
            }
        }

        self.last_notified_bpm = Some(bpm);
        Some(Announcement::Delta {
            mood,
            from: previous,
            to: bpm,
        })
    }

    /// Forget the last notification.
    pub fn reset(&mut self) {
        self.last_notified_bpm = None;
    }
}

impl Default for DeltaNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNIFICANT_DELTA_BPM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_mood_and_previous_sample() {
        let mut n = DeltaNotifier::default();
        assert_eq!(n.observe(None, Some(100.0), 130.0), None);
        assert_eq!(n.observe(Some(Mood::Normal), None, 130.0), None);
        assert_eq!(n.last_notified_bpm(), None);
    }

    #[test]
    fn test_jump_is_announced_once() {
        let mut n = DeltaNotifier::default();
        assert_eq!(
            n.observe(Some(Mood::Normal), Some(100.0), 115.0),
            Some(Announcement::Delta {
                mood: Mood::Normal,
                from: 100.0,
                to: 115.0
            })
        );
        assert_eq!(n.last_notified_bpm(), Some(115.0));

        // Small wiggle afterwards
        assert_eq!(n.observe(Some(Mood::Normal), Some(115.0), 116.0), None);
    }

    #[test]
    fn test_suppressed_near_last_notified() {
        let mut n = DeltaNotifier::default();
        n.observe(Some(Mood::Normal), Some(100.0), 115.0);
        n.observe(Some(Mood::Normal), Some(115.0), 100.0);
        assert_eq!(n.last_notified_bpm(), Some(100.0));

        // Big jump, but back where we last reported
        assert_eq!(n.observe(Some(Mood::Normal), Some(88.0), 101.0), None);
        assert_eq!(n.last_notified_bpm(), Some(100.0));
    }

    #[test]
    fn test_reset() {
        let mut n = DeltaNotifier::default();
        n.observe(Some(Mood::Active), Some(100.0), 120.0);
        n.reset();
        assert_eq!(n.last_notified_bpm(), None);
    }
}
