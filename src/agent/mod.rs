//! The shutdown agent, split into focused submodules.
//!
//! The `ShutdownAgent` struct and its methods are organized by concern:
//! - [`control`] - Countdown entry points (start, cancel, shut down now)
//! - [`ticker`] - The one-second pulse driving an active countdown
//! - [`config_ops`] - Configuration reload and snapshot reads
//! - [`services`] - Background service starters
//! - [`lifecycle`] - Stopping the agent

mod config_ops;
mod control;
mod lifecycle;
mod services;
mod ticker;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::config_store::{ConfigStore, JsonConfigStore};
use crate::countdown::Countdown;
use crate::executor::{self, ShutdownExecutor};
use crate::types::Event;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast, watch};
use tokio_util::sync::CancellationToken;

/// Capacity of the event broadcast channel
///
/// Large enough to hold a full default countdown of tick events for a slow subscriber.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Handle to a running shutdown agent (cloneable - all fields are Arc-wrapped)
///
/// Every countdown operation, whether it comes from the poll loop, the per-second
/// ticker or a user action, goes through the single `countdown` mutex, so `start`,
/// `tick`, `cancel` and `bypass` never interleave.
#[derive(Clone)]
pub struct ShutdownAgent {
    /// The countdown state machine (single writer at a time)
    pub(crate) countdown: Arc<Mutex<Countdown>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Where configuration snapshots come from
    pub(crate) config_store: Arc<dyn ConfigStore>,
    /// The most recent configuration snapshot that loaded successfully
    pub(crate) snapshot_tx: Arc<watch::Sender<Arc<Config>>>,
    /// Performs the shutdown when a countdown expires
    pub(crate) executor: Arc<dyn ShutdownExecutor>,
    /// Source of "now" for schedule evaluation
    pub(crate) clock: Arc<dyn Clock>,
    /// Cancelled when the agent stops; background tasks exit on it
    pub(crate) stop_token: CancellationToken,
}

impl ShutdownAgent {
    /// Create an agent reading configuration from `config_store`
    ///
    /// The initial configuration is loaded immediately. If that fails, the agent starts
    /// with [`Config::default`] and the poll loop keeps retrying the store.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shutdown_scheduler::ShutdownAgent;
    /// use shutdown_scheduler::config_store::MemoryConfigStore;
    /// use shutdown_scheduler::executor::DryRunShutdownExecutor;
    /// use std::sync::Arc;
    ///
    /// # async fn example() {
    /// let agent = ShutdownAgent::new(
    ///     Arc::new(MemoryConfigStore::default()),
    ///     Arc::new(DryRunShutdownExecutor),
    /// )
    /// .await;
    /// let poll_loop = agent.start_poll_loop();
    /// # }
    /// ```
    pub async fn new(
        config_store: Arc<dyn ConfigStore>,
        executor: Arc<dyn ShutdownExecutor>,
    ) -> Self {
        let initial = load_or_default(config_store.as_ref()).await;
        Self::with_snapshot(config_store, executor, initial)
    }

    /// Create an agent from a configuration snapshot that is already loaded
    ///
    /// `initial` is used until the first reload; `config_store` is not read here.
    pub fn with_snapshot(
        config_store: Arc<dyn ConfigStore>,
        executor: Arc<dyn ShutdownExecutor>,
        initial: Config,
    ) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let countdown = Countdown::new(initial.countdown_secs);
        let (snapshot_tx, _snapshot_rx) = watch::channel(Arc::new(initial));

        tracing::info!(
            store = %config_store.describe(),
            executor = executor.name(),
            "Shutdown agent created"
        );

        Self {
            countdown: Arc::new(Mutex::new(countdown)),
            event_tx,
            config_store,
            snapshot_tx: Arc::new(snapshot_tx),
            executor,
            clock: Arc::new(SystemClock),
            stop_token: CancellationToken::new(),
        }
    }

    /// Create an agent backed by a JSON configuration file
    ///
    /// The shutdown executor is chosen from the file's `shutdown` section at this point
    /// (see [`executor::from_config`]); changing that section takes effect on restart.
    pub async fn from_path(path: impl Into<PathBuf>) -> Self {
        let store = JsonConfigStore::new(path);
        let initial = load_or_default(&store).await;
        let executor = executor::from_config(&initial.shutdown);
        Self::with_snapshot(Arc::new(store), executor, initial)
    }

    /// Replace the clock used for schedule evaluation
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Subscribe to agent events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: Event) {
        // No subscribers is fine
        self.event_tx.send(event).ok();
    }
}

async fn load_or_default(config_store: &dyn ConfigStore) -> Config {
    match config_store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                error = %e,
                store = %config_store.describe(),
                "Failed to load configuration, starting with defaults"
            );
            Config::default()
        }
    }
}
