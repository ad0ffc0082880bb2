//! Heart-rate chatbox handler.
//!
//! Turns normalised heart-rate parameter updates into mood announcements in
//! the VRChat chatbox.

use crate::config::{ClassifierConfig, HeartRateConfig};
use crate::core::{Classification, MoodClassifier};
use crate::handler::{ChatSink, ParamValue, ParameterHandler};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Publishes a debounced mood derived from heart-rate samples.
pub struct HeartRateMoodHandler<S: ChatSink> {
    sink: S,
    parameter: String,
    scale: f64,
    prefix: String,
    classifier: MoodClassifier,
}

impl<S: ChatSink> HeartRateMoodHandler<S> {
    /// Create a handler publishing to `sink`.
    pub fn new(sink: S, heart_rate: &HeartRateConfig, classifier: &ClassifierConfig) -> Self {
        Self {
            sink,
            parameter: heart_rate.parameter.clone(),
            scale: heart_rate.scale,
            prefix: classifier.message_prefix.clone(),
            classifier: MoodClassifier::new(classifier),
        }
    }

    /// Handler with default settings.
    pub fn with_defaults(sink: S) -> Self {
        Self::new(sink, &HeartRateConfig::default(), &ClassifierConfig::default())
    }

    /// Ingest a raw parameter value.
    ///
    /// Returns the classification when the value was a valid sample for the
    /// tracked parameter. Other parameters are ignored; invalid values are
    /// logged and dropped without touching any state.
    pub fn ingest(
        &mut self,
        parameter: &str,
        value: &ParamValue,
        now: DateTime<Utc>,
    ) -> Option<Classification> {
        if parameter != self.parameter {
            return None;
        }

        let Some(bpm) = value
            .as_f64()
            .map(|normalised| normalised * self.scale)
            .filter(|bpm| bpm.is_finite())
        else {
            warn!(parameter, %value, "Invalid heart-rate value");
            return None;
        };

        let result = self.classifier.process(bpm, now);
        for announcement in &result.announcements {
            let message = announcement.render(&self.prefix);
            info!(%message, "Announcing mood");
            self.sink.send_to_chat(&message);
        }

        Some(result)
    }

    /// Drop all history and mood state.
    pub fn reset(&mut self) {
        self.classifier.reset();
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &MoodClassifier {
        &self.classifier
    }
}

impl<S: ChatSink> ParameterHandler for HeartRateMoodHandler<S> {
    fn name(&self) -> &str {
        "HeartRateMoodHandler"
    }

    fn on_parameter_changed(&mut self, parameter: &str, value: &ParamValue, now: DateTime<Utc>) {
        self.ingest(parameter, value, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Mood;
    use crate::handler::MemorySink;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn normalised(bpm: f64) -> ParamValue {
        ParamValue::Float(bpm / 250.0)
    }

    fn handler() -> (HeartRateMoodHandler<MemorySink>, MemorySink) {
        let sink = MemorySink::new();
        (HeartRateMoodHandler::with_defaults(sink.clone()), sink)
    }

    #[test]
    fn test_initial_mood_announcement() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(75.0), at(0));
        assert_eq!(sink.messages(), vec!["♡ comfy"]);
    }

    #[test]
    fn test_other_parameters_are_ignored() {
        let (mut h, sink) = handler();
        assert!(h.ingest("GestureLeft", &normalised(75.0), at(0)).is_none());
        assert!(sink.messages().is_empty());
        assert!(h.classifier().history().is_empty());
    }

    #[test]
    fn test_invalid_value_leaves_state_untouched() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(90.0), at(0));
        let before = h.classifier().history().len();

        h.on_parameter_changed("Normalised", &ParamValue::from("not-a-number"), at(1));
        h.on_parameter_changed("Normalised", &ParamValue::Nil, at(2));

        assert_eq!(h.classifier().history().len(), before);
        assert_eq!(sink.messages(), vec!["♡ normal"]);
    }

    #[test]
    fn test_overflowing_value_is_rejected() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(90.0), at(0));

        // Finite before scaling, infinite after
        assert!(h.ingest("Normalised", &ParamValue::Float(1e307), at(1)).is_none());
        assert!(h.ingest("Normalised", &ParamValue::Float(2e307), at(2)).is_none());

        assert_eq!(h.classifier().history().len(), 1);
        assert_eq!(h.classifier().current_mood(), Some(Mood::Normal));
        assert_eq!(sink.messages(), vec!["♡ normal"]);
    }

    #[test]
    fn test_stabilized_mood_change() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(90.0), at(0));

        for s in 1..12 {
            h.on_parameter_changed("Normalised", &normalised(120.0), at(s));
        }
        assert_eq!(h.classifier().current_mood(), Some(Mood::Normal));
        assert!(!sink.messages().iter().any(|m| m.contains("- active")));

        h.on_parameter_changed("Normalised", &normalised(122.0), at(12));
        assert_eq!(sink.last().as_deref(), Some("♡ ↑ 122 - active"));
        assert_eq!(h.classifier().current_mood(), Some(Mood::Active));
    }

    #[test]
    fn test_sudden_jump_message() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(85.0), at(0));
        h.on_parameter_changed("Normalised", &normalised(105.0), at(2));

        let messages = sink.messages();
        assert_eq!(messages[0], "♡ normal");
        assert_eq!(messages[1], "♡ excited");
        assert_eq!(messages[2], "♡ normal (85 -> 105)");
        assert_eq!(h.classifier().current_mood(), Some(Mood::Normal));
    }

    #[test]
    fn test_reset() {
        let (mut h, sink) = handler();
        h.on_parameter_changed("Normalised", &normalised(100.0), at(0));
        h.on_parameter_changed("Normalised", &normalised(115.0), at(1));
        h.reset();

        assert!(h.classifier().history().is_empty());
        assert_eq!(h.classifier().current_mood(), None);
        assert_eq!(h.classifier().last_notified_bpm(), None);

        sink.drain();
        h.on_parameter_changed("Normalised", &normalised(100.0), at(5));
        assert_eq!(sink.messages(), vec!["♡ normal"]);
    }
}
