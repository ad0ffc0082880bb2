//! Rolling baseline estimation.
//!
//! The baseline is the median heart rate over a trailing window, computed from
//! the samples that precede the one being classified.

use crate::core::history::SampleHistory;
use chrono::{DateTime, Duration, Utc};
use statrs::statistics::{Data, Median};

/// Default trailing window for the baseline.
pub const DEFAULT_BASELINE_WINDOW_SECS: i64 = 30;

/// Median of the given values, or `None` when there are none.
pub fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values).median())
}

/// Median BPM over `window` before `now`, excluding the newest sample.
pub fn baseline(history: &SampleHistory, now: DateTime<Utc>, window: Duration) -> Option<f64> {
    median(history.window(now, window, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("median should exist");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_close(median([3.0, 1.0, 2.0].into_iter()), 2.0);
        assert_close(median([90.0, 120.0].into_iter()), 105.0);
        assert_eq!(median(std::iter::empty()), None);
    }

    #[test]
    fn test_median_resists_spike() {
        assert_close(median([80.0, 81.0, 200.0, 79.0, 80.0].into_iter()), 80.0);
    }

    #[test]
    fn test_baseline_excludes_newest() {
        let mut history = SampleHistory::new(10);
        history.record(t0(), 85.0);

        // Only the newest sample exists, so there is no prior context
        assert_eq!(baseline(&history, t0(), Duration::seconds(30)), None);

        let now = t0() + Duration::seconds(2);
        history.record(now, 105.0);
        assert_close(baseline(&history, now, Duration::seconds(30)), 85.0);
    }

    #[test]
    fn test_baseline_includes_sample_at_window_start() {
        let mut history = SampleHistory::new(10);
        history.record(t0(), 85.0);
        let now = t0() + Duration::seconds(30);
        history.record(now, 105.0);
        assert_close(baseline(&history, now, Duration::seconds(30)), 85.0);

        // One second later the first sample has aged out
        let later = now + Duration::seconds(1);
        history.record(later, 104.0);
        assert_close(baseline(&history, later, Duration::seconds(30)), 105.0);
    }

    #[test]
    fn test_baseline_ignores_stale_samples() {
        let mut history = SampleHistory::new(10);
        history.record(t0(), 150.0);
        history.record(t0() + Duration::seconds(45), 70.0);
        let now = t0() + Duration::seconds(50);
        history.record(now, 72.0);

        assert_close(baseline(&history, now, Duration::seconds(30)), 70.0);
    }
}
