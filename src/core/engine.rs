//! The mood classifier: history, baseline, candidate, debounce and
//! notification wired together.

use crate::config::{chrono_duration, ClassifierConfig};
use crate::core::announcement::Announcement;
use crate::core::baseline::baseline;
use crate::core::candidate::{classify, CandidateThresholds};
use crate::core::debounce::{Debouncer, PendingMood};
use crate::core::history::SampleHistory;
use crate::core::mood::{Label, Mood};
use crate::core::notify::DeltaNotifier;
use chrono::{DateTime, Duration, Utc};

/// Outcome of processing one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Raw label for the sample
    pub candidate: Label,
    /// Rolling baseline used for the decision
    pub baseline: Option<f64>,
    /// Announcements to publish, in order
    pub announcements: Vec<Announcement>,
}

/// Streaming heart-rate mood classifier.
///
/// Each call to [`MoodClassifier::process`] handles one sample to completion.
/// Time is always passed in; the classifier never reads the clock.
#[derive(Debug, Clone)]
pub struct MoodClassifier {
    history: SampleHistory,
    baseline_window: Duration,
    thresholds: CandidateThresholds,
    debouncer: Debouncer,
    notifier: DeltaNotifier,
}

impl MoodClassifier {
    /// Create a classifier with the given tuning.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            history: SampleHistory::new(config.history_size),
            baseline_window: chrono_duration(config.baseline_window),
            thresholds: CandidateThresholds::from(config),
            debouncer: Debouncer::new(chrono_duration(config.stabilisation)),
            notifier: DeltaNotifier::new(config.significant_delta_bpm),
        }
    }

    /// Record a validated `bpm` observed at `now` and classify it.
    pub fn process(&mut self, bpm: f64, now: DateTime<Utc>) -> Classification {
        self.history.record(now, bpm);

        let baseline = baseline(&self.history, now, self.baseline_window);
        let previous = self.history.previous().copied();
        let candidate = classify(bpm, now, previous.as_ref(), baseline, &self.thresholds);

        let mut announcements = Vec::new();
        if let Some(announcement) = self.debouncer.observe(candidate, bpm, now) {
            announcements.push(announcement);
        }
        if let Some(announcement) =
            self.notifier
                .observe(self.debouncer.current(), previous.map(|s| s.bpm), bpm)
        {
            announcements.push(announcement);
        }

        Classification {
            candidate,
            baseline,
            announcements,
        }
    }

    /// Return to the initial state: no history, no mood, nothing pending.
    pub fn reset(&mut self) {
        self.history.clear();
        self.debouncer.reset();
        self.notifier.reset();
    }

    /// The published mood, `None` until the first zone sample.
    pub fn current_mood(&self) -> Option<Mood> {
        self.debouncer.current()
    }

    /// Candidate waiting out the stabilisation period.
    pub fn pending(&self) -> Option<&PendingMood> {
        self.debouncer.pending()
    }

    /// BPM of the last significant-jump message.
    pub fn last_notified_bpm(&self) -> Option<f64> {
        self.notifier.last_notified_bpm()
    }

    /// Recorded samples.
    pub fn history(&self) -> &SampleHistory {
        &self.history
    }
}

impl Default for MoodClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::announcement::Direction;
    use crate::core::mood::TransientAlert;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_first_sample_announces() {
        for bpm in [40.0, 55.0, 70.0, 90.0, 120.0, 160.0] {
            let mut c = MoodClassifier::default();
            let result = c.process(bpm, at(0));
            assert_eq!(
                result.announcements,
                vec![Announcement::Initial {
                    mood: Mood::bucket(bpm)
                }]
            );
        }
    }

    #[test]
    fn test_single_flicker_does_not_change_mood() {
        let mut c = MoodClassifier::default();
        c.process(100.0, at(0));
        let flicker = c.process(111.0, at(1));
        assert_eq!(flicker.candidate, Label::Zone(Mood::Active));
        assert!(flicker.announcements.is_empty());
        c.process(101.0, at(2));

        assert_eq!(c.current_mood(), Some(Mood::Normal));
        assert!(c.pending().is_none());
    }

    #[test]
    fn test_sustained_zone_commits_upward() {
        let mut c = MoodClassifier::default();
        c.process(90.0, at(0));

        // The first high sample is an abrupt rise against 90
        let first = c.process(120.0, at(1));
        assert_eq!(first.candidate, Label::Transient(TransientAlert::Excited));

        // Dwell counts from the first active-zone candidate (t = 2)
        for s in 2..12 {
            let result = c.process(120.0, at(s));
            assert_eq!(result.candidate, Label::Zone(Mood::Active));
            assert!(result
                .announcements
                .iter()
                .all(|a| !matches!(a, Announcement::MoodChanged { .. })));
            assert_eq!(c.current_mood(), Some(Mood::Normal));
        }

        let result = c.process(120.0, at(12));
        assert_eq!(
            result.announcements,
            vec![Announcement::MoodChanged {
                direction: Direction::Up,
                bpm: 120.0,
                mood: Mood::Active
            }]
        );
        assert_eq!(c.current_mood(), Some(Mood::Active));
    }

    #[test]
    fn test_sudden_jump_is_transient() {
        let mut c = MoodClassifier::default();
        c.process(85.0, at(0));
        let result = c.process(105.0, at(2));

        assert_eq!(result.candidate, Label::Transient(TransientAlert::Excited));
        assert_eq!(
            result.announcements[0],
            Announcement::Transient {
                alert: TransientAlert::Excited
            }
        );
        assert_eq!(c.current_mood(), Some(Mood::Normal));
    }

    #[test]
    fn test_sudden_drop_is_transient() {
        let mut c = MoodClassifier::default();
        c.process(110.0, at(0));
        let result = c.process(85.0, at(2));

        assert_eq!(result.candidate, Label::Transient(TransientAlert::Calming));
        assert_eq!(c.current_mood(), Some(Mood::Active));
    }

    #[test]
    fn test_delta_notification_once() {
        let mut c = MoodClassifier::default();
        c.process(100.0, at(0));

        let jump = c.process(115.0, at(1));
        assert_eq!(
            jump.announcements,
            vec![Announcement::Delta {
                mood: Mood::Normal,
                from: 100.0,
                to: 115.0
            }]
        );
        assert_eq!(c.last_notified_bpm(), Some(115.0));

        let wiggle = c.process(116.0, at(2));
        assert!(wiggle.announcements.is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut c = MoodClassifier::default();
        c.process(100.0, at(0));
        c.process(115.0, at(1));
        c.process(125.0, at(2));

        c.reset();
        let once = (
            c.history().len(),
            c.current_mood(),
            c.pending().copied(),
            c.last_notified_bpm(),
        );
        c.reset();
        let twice = (
            c.history().len(),
            c.current_mood(),
            c.pending().copied(),
            c.last_notified_bpm(),
        );

        assert_eq!(once, (0, None, None, None));
        assert_eq!(once, twice);

        // Behaves like a fresh instance afterwards
        let result = c.process(70.0, at(10));
        assert_eq!(result.announcements, vec![Announcement::Initial { mood: Mood::Comfy }]);
    }
}
