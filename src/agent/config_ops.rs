//! Configuration reload and snapshot reads.

use crate::config::Config;
use crate::types::Event;
use chrono::{DateTime, Local};
use std::sync::Arc;

use super::ShutdownAgent;

impl ShutdownAgent {
    /// The configuration snapshot currently in effect
    ///
    /// This is the last snapshot that loaded successfully. It only changes when the
    /// poll loop (or [`reload_config`](Self::reload_config)) reloads the store.
    pub fn config(&self) -> Arc<Config> {
        self.snapshot_tx.borrow().clone()
    }

    /// Watch configuration snapshots as they are published
    pub fn watch_config(&self) -> tokio::sync::watch::Receiver<Arc<Config>> {
        self.snapshot_tx.subscribe()
    }

    /// Reload configuration from the store and publish the new snapshot
    ///
    /// On failure the previous snapshot stays in effect, a warning is logged and
    /// [`Event::ConfigReloadFailed`] is emitted. Never fails.
    pub async fn reload_config(&self) -> Arc<Config> {
        match self.config_store.load().await {
            Ok(config) => {
                let config = Arc::new(config);
                self.countdown
                    .lock()
                    .await
                    .set_default_secs(config.countdown_secs);

                let previous = self.snapshot_tx.send_replace(config.clone());
                if *previous != *config {
                    tracing::info!(
                        schedule_times = ?config.schedule_times,
                        enabled = config.enabled,
                        countdown_secs = config.countdown_secs,
                        "Configuration changed"
                    );
                }
                config
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    store = %self.config_store.describe(),
                    "Failed to reload configuration, keeping previous snapshot"
                );
                self.emit(Event::ConfigReloadFailed {
                    error: e.to_string(),
                });
                self.config()
            }
        }
    }

    /// The next scheduled shutdown at or after `now`, for display
    ///
    /// Uses the same snapshot and the same "exactly now counts as upcoming" rule as the
    /// poll loop, so the displayed time and the firing logic cannot disagree. `None`
    /// if no schedule entry parses.
    pub fn next_upcoming(&self, now: &DateTime<Local>) -> Option<DateTime<Local>> {
        self.config().schedule().next_upcoming(now)
    }

    /// The next scheduled shutdown after the agent clock's current time
    pub fn next_scheduled(&self) -> Option<DateTime<Local>> {
        self.next_upcoming(&self.clock.now())
    }
}
