//! Configuration types for shutdown-scheduler
//!
//! The persisted format is a JSON object. Every field is optional and falls back to
//! its default, and unknown fields are ignored, so a config file written by an older
//! or newer version still loads:
//!
//! ```json
//! {
//!   "schedule_times": ["23:00", "01:30"],
//!   "tolerance_secs": 30,
//!   "countdown_secs": 600,
//!   "poll_interval": 60,
//!   "enabled": true,
//!   "shutdown": { "program": null, "args": [], "dry_run": false }
//! }
//! ```
//!
//! A [`Config`] value is an immutable snapshot. The poll loop obtains a fresh one from
//! the [`ConfigStore`](crate::config_store::ConfigStore) every cycle and passes it
//! down explicitly; nothing in the crate mutates a shared settings object.

use crate::countdown::DEFAULT_COUNTDOWN_SECS;
use crate::error::ConfigError;
use crate::scheduler::{Schedule, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// How the machine is shut down when a countdown expires
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Shutdown program (None = platform default, located on PATH)
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Arguments passed to `program` (ignored when `program` is None)
    #[serde(default)]
    pub args: Vec<String>,

    /// Log instead of shutting down (default: false)
    #[serde(default)]
    pub dry_run: bool,
}

/// Main configuration for the shutdown agent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Daily shutdown times as `"HH:mm"` strings (default: `["23:00"]`)
    ///
    /// Kept as raw strings so an unparseable entry survives a load/save round trip.
    /// Such entries are skipped when the schedule is evaluated.
    #[serde(default = "default_schedule_times")]
    pub schedule_times: Vec<String>,

    /// Half-width of the match window around each scheduled time (default: 30)
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: u32,

    /// Countdown length before shutdown (default: 600 = 10 minutes)
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,

    /// How often the schedule is evaluated, in seconds (default: 60)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub poll_interval: Duration,

    /// Whether scheduled countdowns fire at all (default: true)
    ///
    /// Manual "shut down now" and manually started countdowns still work when false.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Shutdown action settings
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule_times: default_schedule_times(),
            tolerance_secs: default_tolerance_secs(),
            countdown_secs: default_countdown_secs(),
            poll_interval: default_poll_interval(),
            enabled: true,
            shutdown: ShutdownConfig::default(),
        }
    }
}

impl Config {
    /// The parsed schedule; unparseable entries are dropped
    pub fn schedule(&self) -> Schedule {
        Schedule::from_entries(&self.schedule_times)
    }

    /// Check the configuration for values the agent cannot honour
    ///
    /// Used before persisting. Loading never validates: a hand-edited file with a bad
    /// schedule entry still loads, and the bad entry is ignored at evaluation time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .schedule_times
            .iter()
            .find(|entry| entry.parse::<TimeOfDay>().is_err())
        {
            return Err(ConfigError::invalid(
                "schedule_times",
                format!("{bad:?} is not a HH:mm time"),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::invalid(
                "poll_interval",
                "must be greater than zero",
            ));
        }

        // A window narrower than the poll interval lets a scheduled time fall between
        // two polls.
        let window = Duration::from_secs(u64::from(self.tolerance_secs) * 2);
        if window < self.poll_interval {
            return Err(ConfigError::invalid(
                "tolerance_secs",
                format!(
                    "a ±{}s window cannot observe every {}s poll; use at least {}s",
                    self.tolerance_secs,
                    self.poll_interval.as_secs(),
                    self.poll_interval.as_secs().div_ceil(2)
                ),
            ));
        }

        if self.countdown_secs == 0 {
            return Err(ConfigError::invalid(
                "countdown_secs",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn default_schedule_times() -> Vec<String> {
    vec!["23:00".into()]
}

fn default_tolerance_secs() -> u32 {
    30
}

fn default_countdown_secs() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
