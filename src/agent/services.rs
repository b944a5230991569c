//! Background service starters.

use crate::scheduler_task::PollTask;

use super::ShutdownAgent;

impl ShutdownAgent {
    /// Start the poll loop that checks the schedule every poll interval
    ///
    /// The loop runs until [`stop`](Self::stop) is called. Starting it more than once
    /// runs independent loops that share the countdown; the re-entrancy guard keeps
    /// them from starting overlapping countdowns, but one loop is the intended setup.
    pub fn start_poll_loop(&self) -> tokio::task::JoinHandle<()> {
        let task = PollTask::new(self.clone());

        let handle = tokio::spawn(async move {
            task.run().await;
        });

        tracing::info!(
            poll_interval_secs = self.config().poll_interval.as_secs(),
            "Poll loop started"
        );

        handle
    }
}
