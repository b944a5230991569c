//! Countdown control: start, cancel, shut down now, status.

use crate::countdown::{CountdownStatus, EndReason, SessionId, Transition};
use crate::error::{Error, ExecutionError, Result};
use crate::types::{Event, Trigger};

use super::ShutdownAgent;

impl ShutdownAgent {
    /// Start a countdown of the configured length
    ///
    /// Returns `Ok(true)` if a new countdown began, `Ok(false)` if one was already
    /// running (it is left untouched: same session, same remaining time).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] after [`stop`](Self::stop).
    pub async fn start_countdown(&self) -> Result<bool> {
        let duration_secs = self.config().countdown_secs;
        let transition = self.begin_countdown(duration_secs, Trigger::Manual).await?;
        Ok(!matches!(transition, Transition::Ignored))
    }

    /// Cancel the running countdown, if any
    ///
    /// Returns `true` if a countdown was cancelled. Cancelling when nothing is running
    /// is not an error.
    pub async fn cancel_countdown(&self) -> bool {
        let transition = self.countdown.lock().await.cancel();
        self.report_cancel(transition)
    }

    /// Emit the event for a cancel transition; `true` if a session was cancelled
    pub(crate) fn report_cancel(&self, transition: Transition) -> bool {
        match transition {
            Transition::Ended {
                session,
                reason: EndReason::Cancelled,
            } => {
                tracing::info!(session, "Countdown cancelled");
                self.emit(Event::CountdownEnded {
                    session,
                    reason: EndReason::Cancelled,
                });
                true
            }
            _ => {
                tracing::debug!("No active countdown to cancel");
                false
            }
        }
    }

    /// Skip the remaining countdown and shut down immediately
    ///
    /// A running countdown is fast-forwarded to expiry; otherwise a session is created
    /// and expired at once. Either way the shutdown runs exactly once.
    ///
    /// # Errors
    ///
    /// - [`Error::Stopped`] after [`stop`](Self::stop)
    /// - [`Error::Execution`] if the shutdown command fails (also emitted as
    ///   [`Event::ShutdownFailed`])
    pub async fn shutdown_now(&self) -> Result<()> {
        let transition = {
            let mut countdown = self.countdown.lock().await;
            if self.is_stopped() {
                return Err(Error::Stopped);
            }
            countdown.bypass()
        };

        match transition {
            Transition::Ended {
                session,
                reason: EndReason::Expired,
            } => {
                tracing::info!(session, "Shutdown requested immediately");
                self.complete_expiry(session).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Current countdown state, for display
    pub async fn status(&self) -> CountdownStatus {
        self.countdown.lock().await.status()
    }

    /// Try to start a countdown and react to the resulting transition
    ///
    /// The stop check happens under the countdown lock, the same lock
    /// [`stop`](Self::stop) holds while cancelling, so no session can start after the
    /// agent has stopped.
    pub(crate) async fn begin_countdown(
        &self,
        duration_secs: u32,
        trigger: Trigger,
    ) -> Result<Transition> {
        let transition = {
            let mut countdown = self.countdown.lock().await;
            if self.is_stopped() {
                tracing::debug!(?trigger, "Agent stopped, not starting countdown");
                return Err(Error::Stopped);
            }
            countdown.start(duration_secs)
        };

        match transition {
            Transition::Started {
                session,
                seconds_remaining,
            } => {
                tracing::info!(session, seconds_remaining, ?trigger, "Countdown started");
                self.emit(Event::CountdownStarted {
                    session,
                    seconds_remaining,
                    trigger,
                });
                self.spawn_ticker(session);
            }
            Transition::Ended {
                session,
                reason: EndReason::Expired,
            } => {
                tracing::info!(session, ?trigger, "Zero-length countdown, shutting down");
                // Already reported through ShutdownFailed
                self.complete_expiry(session).await.ok();
            }
            Transition::Ignored => {
                tracing::debug!(?trigger, "Countdown already active, not restarting");
            }
            Transition::Ticked { .. }
            | Transition::Ended {
                reason: EndReason::Cancelled,
                ..
            } => {}
        }

        Ok(transition)
    }

    /// Report an expired session and run the shutdown, once
    pub(crate) async fn complete_expiry(
        &self,
        session: SessionId,
    ) -> std::result::Result<(), ExecutionError> {
        self.emit(Event::CountdownEnded {
            session,
            reason: EndReason::Expired,
        });

        tracing::info!(session, executor = self.executor.name(), "Countdown expired, shutting down");

        match self.executor.execute().await {
            Ok(()) => {
                tracing::info!(session, "Shutdown command completed");
                self.emit(Event::ShutdownExecuted);
                Ok(())
            }
            Err(e) => {
                tracing::error!(session, error = %e, "Shutdown failed, not retrying");
                self.emit(Event::ShutdownFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
