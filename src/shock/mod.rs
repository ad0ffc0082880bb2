//! Shock device control.
//!
//! Commands pass an intensity safeguard and a cooldown guard before they
//! reach a [`ShockTransport`]. The guard state lives here, independent of
//! whichever transport delivers the command.

#[cfg(feature = "shock")]
pub mod pishock;

#[cfg(feature = "shock")]
pub use pishock::{BlockingPiShockClient, PiShockClient, PiShockCredentials};

use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// PiShock operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Shock,
    Vibrate,
    Beep,
}

impl Operation {
    /// Wire code for the operation.
    pub fn code(self) -> u8 {
        match self {
            Operation::Shock => 0,
            Operation::Vibrate => 1,
            Operation::Beep => 2,
        }
    }
}

/// A single command for the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShockCommand {
    /// Label shown in the device log
    pub name: String,
    pub intensity: u8,
    /// Duration in seconds
    pub duration: u8,
    pub operation: Operation,
}

/// Shock errors.
#[derive(Debug)]
pub enum ShockError {
    /// Requested intensity exceeds the configured ceiling
    IntensityAboveSafeguard { requested: u8, max: u8 },
    /// Credentials are missing or incomplete
    Config(String),
    /// Network/HTTP error
    Network(String),
    /// Device API returned an error response
    Server { status: u16, message: String },
}

impl std::fmt::Display for ShockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShockError::IntensityAboveSafeguard { requested, max } => {
                write!(f, "Safeguard refused intensity {requested} (max {max})")
            }
            ShockError::Config(msg) => write!(f, "Shock config error: {msg}"),
            ShockError::Network(msg) => write!(f, "Shock network error: {msg}"),
            ShockError::Server { status, message } => {
                write!(f, "Shock server error ({status}): {message}")
            }
        }
    }
}

impl std::error::Error for ShockError {}

/// Something that can deliver a command to the device.
pub trait ShockTransport {
    fn deliver(&self, command: &ShockCommand) -> Result<(), ShockError>;
}

/// Rejects commands issued too soon after the previous one.
#[derive(Debug, Clone)]
pub struct CooldownGuard {
    cooldown: Duration,
    last_accepted: Option<DateTime<Utc>>,
}

impl CooldownGuard {
    /// Create a guard that has not accepted anything yet.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    /// Time since the last accepted command while the cooldown is active.
    pub fn cooling_elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_accepted?;
        let elapsed = now - last;
        (elapsed <= self.cooldown).then_some(elapsed)
    }

    /// Accept a command at `now` unless still cooling down.
    pub fn try_acquire(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(elapsed) = self.cooling_elapsed(now) {
            info!(
                elapsed_secs = elapsed.num_seconds(),
                "Shock command rejected, cooldown not done"
            );
            return false;
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Guarded front end for a shock transport.
pub struct Shocker<T: ShockTransport> {
    transport: T,
    guard: CooldownGuard,
    max_intensity: u8,
}

impl<T: ShockTransport> Shocker<T> {
    /// Wrap `transport` with a cooldown and an intensity ceiling.
    pub fn new(transport: T, cooldown: Duration, max_intensity: u8) -> Self {
        Self {
            transport,
            guard: CooldownGuard::new(cooldown),
            max_intensity,
        }
    }

    /// Send `command` at `now`.
    ///
    /// Returns `Ok(false)` when the cooldown swallowed the command and
    /// `Ok(true)` once the transport accepted it.
    pub fn send(&mut self, command: &ShockCommand, now: DateTime<Utc>) -> Result<bool, ShockError> {
        if command.intensity > self.max_intensity {
            return Err(ShockError::IntensityAboveSafeguard {
                requested: command.intensity,
                max: self.max_intensity,
            });
        }
        if !self.guard.try_acquire(now) {
            return Ok(false);
        }

        info!(
            name = %command.name,
            operation = ?command.operation,
            intensity = command.intensity,
            duration = command.duration,
            "Sending shock command"
        );
        self.transport.deliver(command)?;
        Ok(true)
    }
}
