//! Core types for shutdown-scheduler

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub use crate::countdown::{CountdownState, CountdownStatus, EndReason, SessionId};

/// What started a countdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// A scheduled time matched
    Schedule {
        /// The scheduled occurrence that matched
        occurrence: DateTime<Local>,
    },
    /// Started through [`ShutdownAgent::start_countdown`](crate::ShutdownAgent::start_countdown)
    Manual,
}

/// Event emitted by the agent
///
/// Events are observational. The agent does not wait for subscribers and works the
/// same with none attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A countdown session began
    CountdownStarted {
        /// The new session
        session: SessionId,
        /// Seconds until shutdown
        seconds_remaining: u32,
        /// What started it
        trigger: Trigger,
    },

    /// One second passed in an active countdown
    CountdownTick {
        /// The ticking session
        session: SessionId,
        /// Seconds until shutdown
        seconds_remaining: u32,
    },

    /// A countdown session ended
    CountdownEnded {
        /// The session that ended
        session: SessionId,
        /// Expired (shutdown follows) or cancelled
        reason: EndReason,
    },

    /// The shutdown command completed successfully
    ShutdownExecuted,

    /// The shutdown command failed; it will not be retried
    ShutdownFailed {
        /// Error message
        error: String,
    },

    /// Reloading configuration failed; the previous snapshot stays in effect
    ConfigReloadFailed {
        /// Error message
        error: String,
    },

    /// The agent stopped its background tasks
    Stopped,
}
