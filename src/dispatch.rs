//! Parameter dispatch.
//!
//! Tracks the latest value of every avatar parameter and forwards changes to
//! the registered handlers. A handler that panics is logged and skipped; the
//! remaining handlers still see the update.

use crate::handler::{ParamValue, ParameterHandler};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info};

/// A parameter update as received from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterUpdate {
    /// Full OSC address, e.g. `/avatar/parameters/Normalised`
    pub address: String,
    pub value: ParamValue,
}

impl ParameterUpdate {
    /// Create an update for `address`.
    pub fn new(address: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
        }
    }

    /// Parameter name: the last path segment of the address.
    pub fn name(&self) -> &str {
        self.address.rsplit('/').next().unwrap_or(&self.address)
    }
}

#[derive(Default)]
pub struct ParameterDispatcher {
    parameters: HashMap<String, ParamValue>,
    handlers: Vec<Box<dyn ParameterHandler>>,
}

impl ParameterDispatcher {
    /// Create a dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler to receive parameter changes.
    pub fn add_handler(&mut self, handler: Box<dyn ParameterHandler>) {
        info!(handler = handler.name(), "Registered handler");
        self.handlers.push(handler);
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Record `update` and notify handlers if the value changed.
    ///
    /// Returns whether handlers were notified.
    pub fn dispatch(&mut self, update: &ParameterUpdate, now: DateTime<Utc>) -> bool {
        let name = update.name();

        let previous = self
            .parameters
            .insert(name.to_string(), update.value.clone());
        if previous.as_ref() == Some(&update.value) {
            return false;
        }

        debug!(parameter = name, value = %update.value, "Parameter changed");
        for handler in self.handlers.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| {
                handler.on_parameter_changed(name, &update.value, now)
            }));
            if let Err(panic) = result {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    handler = handler.name(),
                    parameter = name,
                    "Error in handler: {reason}"
                );
            }
        }
        true
    }

    /// Latest value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Copy of all known parameter values.
    pub fn parameters(&self) -> HashMap<String, ParamValue> {
        self.parameters.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(String, ParamValue)>>>;

    struct Recorder(Seen);

    impl ParameterHandler for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }

        fn on_parameter_changed(&mut self, parameter: &str, value: &ParamValue, _now: DateTime<Utc>) {
            self.0
                .lock()
                .unwrap()
                .push((parameter.to_string(), value.clone()));
        }
    }

    struct Faulty;

    impl ParameterHandler for Faulty {
        fn name(&self) -> &str {
            "Faulty"
        }

        fn on_parameter_changed(&mut self, _: &str, _: &ParamValue, _: DateTime<Utc>) {
            panic!("boom");
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_update_name() {
        let update = ParameterUpdate::new("/avatar/parameters/Normalised", 0.4);
        assert_eq!(update.name(), "Normalised");
        assert_eq!(ParameterUpdate::new("bare", 1i64).name(), "bare");
    }

    #[test]
    fn test_only_changes_are_dispatched() {
        let seen = Seen::default();
        let mut dispatcher = ParameterDispatcher::new();
        dispatcher.add_handler(Box::new(Recorder(seen.clone())));

        let update = ParameterUpdate::new("/avatar/parameters/Normalised", 0.4);
        assert!(dispatcher.dispatch(&update, now()));
        assert!(!dispatcher.dispatch(&update, now()));
        assert!(dispatcher.dispatch(&ParameterUpdate::new("/avatar/parameters/Normalised", 0.5), now()));

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(dispatcher.get("Normalised"), Some(&ParamValue::Float(0.5)));
        assert_eq!(dispatcher.parameters().len(), 1);
    }

    #[test]
    fn test_faulty_handler_does_not_block_others() {
        let seen = Seen::default();
        let mut dispatcher = ParameterDispatcher::new();
        dispatcher.add_handler(Box::new(Faulty));
        dispatcher.add_handler(Box::new(Recorder(seen.clone())));
        assert_eq!(dispatcher.handler_count(), 2);

        dispatcher.dispatch(&ParameterUpdate::new("/avatar/parameters/tail_IsGrabbed", true), now());

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[("tail_IsGrabbed".to_string(), ParamValue::Bool(true))]
        );
    }
}
