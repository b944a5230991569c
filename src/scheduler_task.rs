//! The schedule poll loop
//!
//! [`PollTask`] wakes every poll interval, reloads the configuration snapshot, and
//! starts a countdown when the current time falls inside the tolerance window of a
//! scheduled time.
//!
//! # Firing rules
//!
//! - Each scheduled occurrence starts at most one countdown. With a ±30s window and a
//!   60s poll interval, one or two polls can land inside the same window; only the
//!   first acts.
//! - A match while a countdown is already running does not restart or reset it, and
//!   the occurrence is still considered handled.
//! - Nothing fires while the schedule is disabled.
//!
//! # Example
//!
//! ```no_run
//! use shutdown_scheduler::ShutdownAgent;
//! use shutdown_scheduler::scheduler_task::PollTask;
//!
//! # async fn example() {
//! let agent = ShutdownAgent::from_path("config.json").await;
//! let task = PollTask::new(agent.clone());
//!
//! // Runs until agent.stop() is called
//! tokio::spawn(async move {
//!     task.run().await;
//! });
//! # }
//! ```

use crate::ShutdownAgent;
use crate::countdown::Transition;
use crate::types::Trigger;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Shortest poll interval the loop will run at
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What a single poll did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The agent is stopped
    Stopped,
    /// Scheduled shutdowns are disabled in the current snapshot
    Disabled,
    /// No scheduled time is within tolerance of now
    NoMatch,
    /// The matching occurrence already fired on an earlier poll
    AlreadyFired {
        /// The matched occurrence
        occurrence: DateTime<Local>,
    },
    /// A countdown was already running; it was left alone
    AlreadyActive {
        /// The matched occurrence
        occurrence: DateTime<Local>,
    },
    /// A countdown started for the occurrence
    Started {
        /// The matched occurrence
        occurrence: DateTime<Local>,
    },
}

/// Background task that evaluates the schedule on every poll
pub struct PollTask {
    agent: ShutdownAgent,

    /// The occurrence that most recently matched, so a second poll inside the same
    /// window does nothing
    last_fired: Option<DateTime<Local>>,
}

impl PollTask {
    /// Creates a poll task for `agent`
    pub fn new(agent: ShutdownAgent) -> Self {
        Self {
            agent,
            last_fired: None,
        }
    }

    /// Runs the poll loop until the agent stops
    ///
    /// The first poll happens immediately. The interval follows the configured
    /// `poll_interval`, picking up changes after the poll that loaded them.
    pub async fn run(mut self) {
        info!("Poll task started");

        let mut period = self.poll_period();
        let mut interval = poll_interval(Instant::now(), period);

        loop {
            tokio::select! {
                biased;

                _ = self.agent.stop_token.cancelled() => {
                    break;
                }
                _ = interval.tick() => {
                    let outcome = self.poll_once().await;
                    debug!(?outcome, "Poll complete");

                    let configured = self.poll_period();
                    if configured != period {
                        info!(
                            old_secs = period.as_secs(),
                            new_secs = configured.as_secs(),
                            "Poll interval changed"
                        );
                        period = configured;
                        interval = poll_interval(Instant::now() + period, period);
                    }
                }
            }
        }

        info!("Poll task stopped");
    }

    /// Evaluate the schedule once against the agent clock
    pub async fn poll_once(&mut self) -> PollOutcome {
        if self.agent.is_stopped() {
            return PollOutcome::Stopped;
        }

        let config = self.agent.reload_config().await;
        if !config.enabled {
            debug!("Scheduled shutdowns disabled");
            return PollOutcome::Disabled;
        }

        let now = self.agent.clock.now();
        let Some(occurrence) = config
            .schedule()
            .matching_occurrence(&now, config.tolerance_secs)
        else {
            return PollOutcome::NoMatch;
        };

        if self.last_fired == Some(occurrence) {
            debug!(%occurrence, "Occurrence already handled");
            return PollOutcome::AlreadyFired { occurrence };
        }
        self.last_fired = Some(occurrence);

        info!(%occurrence, %now, "Scheduled shutdown time reached");
        let transition = self
            .agent
            .begin_countdown(config.countdown_secs, Trigger::Schedule { occurrence })
            .await;

        match transition {
            Err(_) => PollOutcome::Stopped,
            Ok(Transition::Ignored) => PollOutcome::AlreadyActive { occurrence },
            Ok(_) => PollOutcome::Started { occurrence },
        }
    }

    fn poll_period(&self) -> Duration {
        self.agent.config().poll_interval.max(MIN_POLL_INTERVAL)
    }
}

fn poll_interval(start: Instant, period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(start, period);
    // After a suspend, poll once and carry on rather than bursting missed polls
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
