//! Tail-grab handler.
//!
//! Watches the tail PhysBone's `_IsGrabbed` parameter and fires a shock when
//! a grabbed tail is let go.

use crate::config::{chrono_duration, ShockConfig};
use crate::handler::{ChatSink, ParamValue, ParameterHandler};
use crate::shock::{Operation, ShockCommand, ShockTransport, Shocker};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

pub struct TailGrabHandler<T: ShockTransport, S: ChatSink> {
    sink: S,
    shocker: Shocker<T>,
    parameter: String,
    command: ShockCommand,
    message: String,
    /// Last observed grab state, `None` until the first update
    is_grabbed: Option<bool>,
}

impl<T: ShockTransport, S: ChatSink> TailGrabHandler<T, S> {
    /// Create a handler shocking through `transport` and chatting through `sink`.
    pub fn new(transport: T, sink: S, config: &ShockConfig) -> Self {
        let cooldown = chrono_duration(config.cooldown);
        Self {
            sink,
            shocker: Shocker::new(transport, cooldown, config.max_intensity),
            parameter: config.grabbed_parameter(),
            command: ShockCommand {
                name: "Shock From Tail Grab".to_string(),
                intensity: config.intensity,
                duration: config.duration_secs,
                operation: Operation::Shock,
            },
            message: config.message.clone(),
            is_grabbed: None,
        }
    }

    /// Last observed grab state.
    pub fn is_grabbed(&self) -> Option<bool> {
        self.is_grabbed
    }

    fn send_shock(&mut self, now: DateTime<Utc>) {
        match self.shocker.send(&self.command, now) {
            Ok(true) => self.sink.send_to_chat(&self.message),
            Ok(false) => {}
            Err(e) => error!("Failed to send shock: {e}"),
        }
    }
}

impl<T: ShockTransport, S: ChatSink> ParameterHandler for TailGrabHandler<T, S> {
    fn name(&self) -> &str {
        "TailGrabHandler"
    }

    fn on_parameter_changed(&mut self, parameter: &str, value: &ParamValue, now: DateTime<Utc>) {
        if parameter != self.parameter {
            return;
        }
        info!(parameter, %value, "Tracked parameter changed");

        let Some(grabbed) = value.as_bool() else {
            warn!(parameter, %value, "Invalid grab value");
            return;
        };

        let was_grabbed = self.is_grabbed.replace(grabbed);
        if was_grabbed == Some(true) && !grabbed {
            self.send_shock(now);
        }
    }
}
