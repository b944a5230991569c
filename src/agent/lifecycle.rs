//! Stopping the agent.

use crate::types::Event;

use super::ShutdownAgent;

impl ShutdownAgent {
    /// Stop the agent
    ///
    /// This method:
    /// 1. Signals the poll loop and countdown ticker to exit
    /// 2. Cancels a running countdown so no shutdown fires after the agent stops
    /// 3. Emits [`Event::Stopped`]
    ///
    /// After this, [`start_countdown`](Self::start_countdown) and
    /// [`shutdown_now`](Self::shutdown_now) return [`Error::Stopped`](crate::Error::Stopped).
    /// Calling `stop` again has no effect.
    pub async fn stop(&self) {
        // Cancelling the token under the countdown lock orders it against every
        // start: a start either completes first and is cancelled here, or sees the
        // token and refuses.
        let transition = {
            let mut countdown = self.countdown.lock().await;
            if self.stop_token.is_cancelled() {
                return;
            }
            tracing::info!("Stopping shutdown agent");
            self.stop_token.cancel();
            countdown.cancel()
        };

        if self.report_cancel(transition) {
            tracing::info!("Cancelled running countdown during stop");
        }

        self.emit(Event::Stopped);
        tracing::info!("Shutdown agent stopped");
    }

    /// Whether [`stop`](Self::stop) has been called
    pub fn is_stopped(&self) -> bool {
        self.stop_token.is_cancelled()
    }
}
