//! Configuration for the heart-rate mood agent.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest duration accepted for any configured window or cooldown (one year).
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Convert a configured duration for timestamp arithmetic.
///
/// Values above [`MAX_DURATION_SECS`] are capped.
pub fn chrono_duration(duration: Duration) -> chrono::Duration {
    let capped = duration.min(Duration::from_secs(MAX_DURATION_SECS));
    chrono::Duration::from_std(capped)
        .unwrap_or_else(|_| chrono::Duration::seconds(MAX_DURATION_SECS as i64))
}

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the agent listens on for OSC messages sent by VRChat
    pub osc_receive_addr: SocketAddr,

    /// Address VRChat listens on for incoming OSC messages
    pub osc_send_addr: SocketAddr,

    /// Heart-rate ingestion settings
    pub heart_rate: HeartRateConfig,

    /// Mood classifier tuning
    pub classifier: ClassifierConfig,

    /// Tail-grab shock settings
    pub shock: ShockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            osc_receive_addr: SocketAddr::from(([127, 0, 0, 1], 9003)),
            osc_send_addr: SocketAddr::from(([127, 0, 0, 1], 9002)),
            heart_rate: HeartRateConfig::default(),
            classifier: ClassifierConfig::default(),
            shock: ShockConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("heartrate-mood-agent")
            .join("config.json")
    }
}

/// Which avatar parameter carries the heart rate and how to scale it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartRateConfig {
    /// Avatar parameter name carrying the normalised heart rate
    pub parameter: String,
    /// Multiplier turning the normalised [0, 1] value into BPM
    pub scale: f64,
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            parameter: "Normalised".to_string(),
            scale: 250.0,
        }
    }
}

/// Tuning constants for the mood classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum samples kept in history
    pub history_size: usize,

    /// Trailing window for the median baseline
    #[serde(with = "duration_serde")]
    pub baseline_window: Duration,

    /// How long a new zone must persist before it is announced
    #[serde(with = "duration_serde")]
    pub stabilisation: Duration,

    /// Rise (BPM) that raises an "excited" alert
    pub sudden_jump_bpm: f64,

    /// Maximum gap between consecutive samples for a rise to count
    #[serde(with = "duration_serde")]
    pub sudden_jump_window: Duration,

    /// Fall (BPM) that raises a "calming" alert
    pub sudden_drop_bpm: f64,

    /// Maximum gap between consecutive samples for a fall to count
    #[serde(with = "duration_serde")]
    pub sudden_drop_window: Duration,

    /// Jump (BPM) announced even when the mood is unchanged
    pub significant_delta_bpm: f64,

    /// Text prepended to every chat line
    pub message_prefix: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            history_size: 180, // ~3 minutes at 1 Hz
            baseline_window: Duration::from_secs(30),
            stabilisation: Duration::from_secs(10),
            sudden_jump_bpm: 18.0,
            sudden_jump_window: Duration::from_secs(30),
            sudden_drop_bpm: 18.0,
            sudden_drop_window: Duration::from_secs(30),
            significant_delta_bpm: 12.0,
            message_prefix: "♡ ".to_string(),
        }
    }
}

/// Settings for shocking on tail release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockConfig {
    /// Register the tail handler on `run` without passing `--shock`
    pub enabled: bool,
    /// Avatar parameter prefix of the tail PhysBone
    pub tail_parameter: String,
    /// Intensity sent on tail release
    pub intensity: u8,
    /// Shock duration in seconds
    pub duration_secs: u8,
    /// Minimum time between two shocks
    #[serde(with = "duration_serde")]
    pub cooldown: Duration,
    /// Hard ceiling; commands above it are refused
    pub max_intensity: u8,
    /// Chat line sent after a shock was delivered
    pub message: String,
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tail_parameter: "tail".to_string(),
            intensity: 1,
            duration_secs: 1,
            cooldown: Duration::from_secs(30),
            max_intensity: 5,
            message: "⚡️".to_string(),
        }
    }
}

impl ShockConfig {
    /// Full name of the parameter signalling the tail is grabbed.
    pub fn grabbed_parameter(&self) -> String {
        format!("{}_IsGrabbed", self.tail_parameter)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as whole seconds.
mod duration_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        if secs > super::MAX_DURATION_SECS {
            return Err(D::Error::custom(format!(
                "duration of {secs}s exceeds the maximum of {}s",
                super::MAX_DURATION_SECS
            )));
        }
        Ok(Duration::from_secs(secs))
    }
}
