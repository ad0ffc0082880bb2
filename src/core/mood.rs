//! Mood catalogue and candidate labels.
//!
//! Moods are fixed heart-rate zones. Each zone owns a half-open BPM interval
//! `[start, end)` and a rank; together the intervals cover the whole real
//! line. Transient alerts ("excited", "calming") sit outside the catalogue:
//! they flag a rapid change rather than membership of a zone.

use std::cmp::Ordering;
use std::fmt;

/// A heart-rate zone, ordered from slowest to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    DeepSleeping,
    Sleeping,
    Comfy,
    Normal,
    Active,
    Intense,
}

/// Catalogue entry describing one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodZone {
    pub mood: Mood,
    /// Position in the total order (0 = slowest)
    pub rank: u8,
    /// Inclusive lower bound, `None` for unbounded
    pub start: Option<f64>,
    /// Exclusive upper bound, `None` for unbounded
    pub end: Option<f64>,
}

impl MoodZone {
    /// Whether `bpm` falls inside `[start, end)`.
    pub fn contains(&self, bpm: f64) -> bool {
        let above_start = self.start.map_or(true, |start| bpm >= start);
        let below_end = self.end.map_or(true, |end| bpm < end);
        above_start && below_end
    }
}

/// The mood catalogue, sorted by rank.
pub static MOOD_CATALOGUE: [MoodZone; 6] = [
    MoodZone {
        mood: Mood::DeepSleeping,
        rank: 0,
        start: None,
        end: Some(50.0),
    },
    MoodZone {
        mood: Mood::Sleeping,
        rank: 1,
        start: Some(50.0),
        end: Some(60.0),
    },
    MoodZone {
        mood: Mood::Comfy,
        rank: 2,
        start: Some(60.0),
        end: Some(79.0),
    },
    MoodZone {
        mood: Mood::Normal,
        rank: 3,
        start: Some(79.0),
        end: Some(110.0),
    },
    MoodZone {
        mood: Mood::Active,
        rank: 4,
        start: Some(110.0),
        end: Some(135.0),
    },
    MoodZone {
        mood: Mood::Intense,
        rank: 5,
        start: Some(135.0),
        end: None,
    },
];

impl Mood {
    /// Catalogue entry for this mood.
    pub fn zone(self) -> &'static MoodZone {
        match self {
            Mood::DeepSleeping => &MOOD_CATALOGUE[0],
            Mood::Sleeping => &MOOD_CATALOGUE[1],
            Mood::Comfy => &MOOD_CATALOGUE[2],
            Mood::Normal => &MOOD_CATALOGUE[3],
            Mood::Active => &MOOD_CATALOGUE[4],
            Mood::Intense => &MOOD_CATALOGUE[5],
        }
    }

    /// Position in the catalogue, lowest heart rate first.
    pub fn rank(self) -> u8 {
        self.zone().rank
    }

    /// Human-readable label used in chat messages.
    pub fn name(self) -> &'static str {
        match self {
            Mood::DeepSleeping => "deep sleeping",
            Mood::Sleeping => "sleeping",
            Mood::Comfy => "comfy",
            Mood::Normal => "normal",
            Mood::Active => "active",
            Mood::Intense => "intense",
        }
    }

    /// Look up the zone containing `bpm`, or `None` if no zone matches.
    ///
    /// Only a non-finite `bpm` can miss: the catalogue is a total partition.
    pub fn lookup(bpm: f64) -> Option<Mood> {
        MOOD_CATALOGUE
            .iter()
            .find(|zone| zone.contains(bpm))
            .map(|zone| zone.mood)
    }

    /// Bucket a finite `bpm` into its zone.
    ///
    /// # Panics
    ///
    /// Panics if `bpm` is NaN. Samples are validated as finite before they
    /// reach the classifier.
    pub fn bucket(bpm: f64) -> Mood {
        match Mood::lookup(bpm) {
            Some(mood) => mood,
            None => unreachable!("mood catalogue has no zone for {bpm} bpm"),
        }
    }
}

impl PartialOrd for Mood {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mood {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short-lived alert raised on an abrupt change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientAlert {
    Excited,
    Calming,
}

impl TransientAlert {
    /// Chat text for the alert.
    pub fn name(self) -> &'static str {
        match self {
            TransientAlert::Excited => "excited",
            TransientAlert::Calming => "calming",
        }
    }
}

impl fmt::Display for TransientAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw classification of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Zone(Mood),
    Transient(TransientAlert),
}

impl Label {
    /// Whether this is an alert rather than a zone.
    pub fn is_transient(&self) -> bool {
        matches!(self, Label::Transient(_))
    }
}

impl From<Mood> for Label {
    fn from(mood: Mood) -> Self {
        Label::Zone(mood)
    }
}

impl From<TransientAlert> for Label {
    fn from(alert: TransientAlert) -> Self {
        Label::Transient(alert)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Zone(mood) => mood.fmt(f),
            Label::Transient(alert) => alert.fmt(f),
        }
    }
}

/// Catalogue defects detected by [`validate_catalogue`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueError {
    /// The first zone has a lower bound
    BoundedStart(Mood),
    /// The last zone has an upper bound
    BoundedEnd(Mood),
    /// Adjacent zones leave a gap or overlap
    Discontinuity { below: Mood, above: Mood },
    /// Ranks are not strictly increasing in catalogue order
    RankOrder { below: Mood, above: Mood },
}

impl fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogueError::BoundedStart(m) => write!(f, "first zone {m} has a lower bound"),
            CatalogueError::BoundedEnd(m) => write!(f, "last zone {m} has an upper bound"),
            CatalogueError::Discontinuity { below, above } => {
                write!(f, "zones {below} and {above} are not contiguous")
            }
            CatalogueError::RankOrder { below, above } => {
                write!(f, "zone {above} does not outrank {below}")
            }
        }
    }
}

impl std::error::Error for CatalogueError {}

/// Check that `zones` partition the real line in rank order.
pub fn validate_catalogue(zones: &[MoodZone]) -> Result<(), CatalogueError> {
    if let Some(first) = zones.first() {
        if first.start.is_some() {
            return Err(CatalogueError::BoundedStart(first.mood));
        }
    }
    if let Some(last) = zones.last() {
        if last.end.is_some() {
            return Err(CatalogueError::BoundedEnd(last.mood));
        }
    }

    for pair in zones.windows(2) {
        let (below, above) = (&pair[0], &pair[1]);
        if below.end.is_none() || below.end != above.start {
            return Err(CatalogueError::Discontinuity {
                below: below.mood,
                above: above.mood,
            });
        }
        if above.rank <= below.rank {
            return Err(CatalogueError::RankOrder {
                below: below.mood,
                above: above.mood,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_catalogue_is_valid() {
        assert_eq!(validate_catalogue(&MOOD_CATALOGUE), Ok(()));
    }

    #[test]
    fn test_validate_detects_gap() {
        let mut zones = MOOD_CATALOGUE;
        zones[2].end = Some(78.0);
        assert_eq!(
            validate_catalogue(&zones),
            Err(CatalogueError::Discontinuity {
                below: Mood::Comfy,
                above: Mood::Normal
            })
        );

        let mut zones = MOOD_CATALOGUE;
        zones[5].end = Some(200.0);
        assert_eq!(
            validate_catalogue(&zones),
            Err(CatalogueError::BoundedEnd(Mood::Intense))
        );
    }

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (49.9, Mood::DeepSleeping),
            (50.0, Mood::Sleeping),
            (59.9, Mood::Sleeping),
            (60.0, Mood::Comfy),
            (78.9, Mood::Comfy),
            (79.0, Mood::Normal),
            (109.9, Mood::Normal),
            (110.0, Mood::Active),
            (134.9, Mood::Active),
            (135.0, Mood::Intense),
        ];
        for (bpm, expected) in cases {
            assert_eq!(Mood::bucket(bpm), expected, "bpm {bpm}");
        }
    }

    #[test]
    fn test_bucket_extremes() {
        assert_eq!(Mood::bucket(f64::NEG_INFINITY), Mood::DeepSleeping);
        assert_eq!(Mood::bucket(-10.0), Mood::DeepSleeping);
        assert_eq!(Mood::bucket(f64::INFINITY), Mood::Intense);
        assert_eq!(Mood::lookup(f64::NAN), None);
    }

    #[test]
    fn test_mood_ordering_follows_rank() {
        assert!(Mood::Active > Mood::Normal);
        assert!(Mood::DeepSleeping < Mood::Sleeping);
        let mut moods = vec![Mood::Intense, Mood::Comfy, Mood::DeepSleeping];
        moods.sort();
        assert_eq!(moods, vec![Mood::DeepSleeping, Mood::Comfy, Mood::Intense]);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Zone(Mood::DeepSleeping).to_string(), "deep sleeping");
        assert_eq!(Label::Transient(TransientAlert::Calming).to_string(), "calming");
        assert!(Label::from(TransientAlert::Excited).is_transient());
        assert!(!Label::from(Mood::Normal).is_transient());
    }

    proptest! {
        #[test]
        fn test_bucket_matches_exactly_one_zone(bpm in -1000.0f64..1000.0f64) {
            let matching: Vec<Mood> = MOOD_CATALOGUE
                .iter()
                .filter(|zone| zone.contains(bpm))
                .map(|zone| zone.mood)
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0], Mood::bucket(bpm));
        }
    }
}
