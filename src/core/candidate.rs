//! Candidate label derivation for a single sample.

use crate::config::{chrono_duration, ClassifierConfig};
use crate::core::history::Sample;
use crate::core::mood::{Label, Mood, TransientAlert};
use chrono::{DateTime, Duration, Utc};

/// Thresholds used to spot abrupt changes.
#[derive(Debug, Clone, Copy)]
pub struct CandidateThresholds {
    pub jump_bpm: f64,
    pub jump_window: Duration,
    pub drop_bpm: f64,
    pub drop_window: Duration,
}

impl From<&ClassifierConfig> for CandidateThresholds {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            jump_bpm: config.sudden_jump_bpm,
            jump_window: chrono_duration(config.sudden_jump_window),
            drop_bpm: config.sudden_drop_bpm,
            drop_window: chrono_duration(config.sudden_drop_window),
        }
    }
}

impl Default for CandidateThresholds {
    fn default() -> Self {
        Self::from(&ClassifierConfig::default())
    }
}

/// Classify `bpm` observed at `now`.
///
/// Checks, in order:
/// 1. A rise or fall against the previous sample, if it is recent enough
/// 2. Deviation from the rolling baseline
/// 3. The zone containing `bpm`
pub fn classify(
    bpm: f64,
    now: DateTime<Utc>,
    previous: Option<&Sample>,
    baseline: Option<f64>,
    thresholds: &CandidateThresholds,
) -> Label {
    if let Some(prev) = previous {
        let gap = now - prev.timestamp;
        if bpm - prev.bpm >= thresholds.jump_bpm && gap <= thresholds.jump_window {
            return TransientAlert::Excited.into();
        }
        if prev.bpm - bpm >= thresholds.drop_bpm && gap <= thresholds.drop_window {
            return TransientAlert::Calming.into();
        }
    }

    if let Some(baseline) = baseline {
        let delta = bpm - baseline;
        if delta >= thresholds.jump_bpm {
            return TransientAlert::Excited.into();
        }
        if -delta >= thresholds.drop_bpm {
            return TransientAlert::Calming.into();
        }
    }

    Mood::bucket(bpm).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn classify_default(
        bpm: f64,
        now: DateTime<Utc>,
        previous: Option<Sample>,
        baseline: Option<f64>,
    ) -> Label {
        classify(
            bpm,
            now,
            previous.as_ref(),
            baseline,
            &CandidateThresholds::default(),
        )
    }

    #[test]
    fn test_zone_without_context() {
        assert_eq!(classify_default(45.0, t0(), None, None), Label::Zone(Mood::DeepSleeping));
        assert_eq!(classify_default(90.0, t0(), None, None), Label::Zone(Mood::Normal));
        assert_eq!(classify_default(150.0, t0(), None, None), Label::Zone(Mood::Intense));
    }

    #[test]
    fn test_jump_against_previous_sample() {
        let prev = Sample::new(t0(), 85.0);
        let now = t0() + Duration::seconds(2);
        assert_eq!(
            classify_default(103.0, now, Some(prev), None),
            Label::Transient(TransientAlert::Excited)
        );
        assert_eq!(
            classify_default(67.0, now, Some(prev), None),
            Label::Transient(TransientAlert::Calming)
        );
        // Just under the threshold falls through to the zone
        assert_eq!(classify_default(102.0, now, Some(prev), None), Label::Zone(Mood::Normal));
    }

    #[test]
    fn test_stale_previous_sample_is_ignored() {
        let prev = Sample::new(t0(), 85.0);
        let now = t0() + Duration::seconds(31);
        assert_eq!(classify_default(120.0, now, Some(prev), None), Label::Zone(Mood::Active));

        let now = t0() + Duration::seconds(30);
        assert_eq!(
            classify_default(120.0, now, Some(prev), None),
            Label::Transient(TransientAlert::Excited)
        );
    }

    #[test]
    fn test_baseline_deviation() {
        let prev = Sample::new(t0(), 100.0);
        let now = t0() + Duration::seconds(1);
        assert_eq!(
            classify_default(110.0, now, Some(prev), Some(90.0)),
            Label::Transient(TransientAlert::Excited)
        );
        assert_eq!(
            classify_default(95.0, now, Some(prev), Some(115.0)),
            Label::Transient(TransientAlert::Calming)
        );
        assert_eq!(
            classify_default(105.0, now, Some(prev), Some(100.0)),
            Label::Zone(Mood::Normal)
        );
    }
}
