//! The one-second pulse behind an active countdown.

use crate::countdown::{EndReason, SessionId, Transition};
use crate::types::Event;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

use super::ShutdownAgent;

/// Interval between countdown pulses
pub(crate) const TICK_INTERVAL: Duration = Duration::from_secs(1);

impl ShutdownAgent {
    /// Spawn the pulse task for `session`
    ///
    /// The task ticks once per second and exits as soon as `session` is no longer the
    /// active one (expired, cancelled, or replaced), or when the agent stops.
    pub(crate) fn spawn_ticker(&self, session: SessionId) -> tokio::task::JoinHandle<()> {
        let agent = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            // Resume where it left off after a stall (e.g. system suspend)
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if !matches!(agent.pulse(session).await, Transition::Ticked { .. }) {
                            break;
                        }
                    }
                    _ = agent.stop_token.cancelled() => {
                        break;
                    }
                }
            }
            tracing::debug!(session, "Countdown ticker exited");
        })
    }

    /// Advance `session` by one second
    ///
    /// Ignored unless `session` is the active session, so a pulse that belongs to an
    /// ended session cannot touch a newer one.
    pub(crate) async fn pulse(&self, session: SessionId) -> Transition {
        let transition = {
            let mut countdown = self.countdown.lock().await;
            if countdown.active_session() != Some(session) {
                return Transition::Ignored;
            }
            countdown.tick()
        };

        match transition {
            Transition::Ticked {
                session,
                seconds_remaining,
            } => {
                self.emit(Event::CountdownTick {
                    session,
                    seconds_remaining,
                });
            }
            Transition::Ended {
                session,
                reason: EndReason::Expired,
            } => {
                // Already reported through ShutdownFailed
                self.complete_expiry(session).await.ok();
            }
            _ => {}
        }

        transition
    }
}
