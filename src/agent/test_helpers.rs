//! Shared test helpers for creating ShutdownAgent instances in tests.

use crate::clock::ManualClock;
use crate::config::Config;
use crate::config_store::{ConfigStore, MemoryConfigStore};
use crate::error::{ExecutionError, Result};
use crate::executor::ShutdownExecutor;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

use super::ShutdownAgent;

/// Executor that counts calls instead of shutting down
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingExecutor {
    pub(crate) fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(true),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShutdownExecutor for RecordingExecutor {
    async fn execute(&self) -> std::result::Result<(), ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ExecutionError::Failed {
                program: "shutdown".into(),
                status: "exit status: 1".to_string(),
                stderr: "must be superuser".to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Memory store that can be switched into a failing mode
#[derive(Default)]
pub(crate) struct FlakyConfigStore {
    pub(crate) inner: MemoryConfigStore,
    pub(crate) failing: AtomicBool,
    /// Number of `load` calls so far
    pub(crate) loads: AtomicUsize,
}

#[async_trait]
impl ConfigStore for FlakyConfigStore {
    async fn load(&self) -> Result<Config> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("store unavailable").into());
        }
        self.inner.load().await
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

/// Memory store whose `load` can be held open until the test releases it
#[derive(Default)]
pub(crate) struct GatedConfigStore {
    pub(crate) inner: MemoryConfigStore,
    closed: AtomicBool,
    /// Notified when a `load` reaches the closed gate
    pub(crate) entered: Notify,
    release: Notify,
}

impl GatedConfigStore {
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn open(&self) {
        self.closed.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }
}

#[async_trait]
impl ConfigStore for GatedConfigStore {
    async fn load(&self) -> Result<Config> {
        if self.closed.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.load().await
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

/// A local instant on a fixed summer date with no DST transition nearby
pub(crate) fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 15, hour, minute, second)
        .earliest()
        .unwrap()
}

/// One shutdown a day at 21:00 with the default window, countdown and poll interval
pub(crate) fn test_config() -> Config {
    Config {
        schedule_times: vec!["21:00".to_string()],
        ..Default::default()
    }
}

pub(crate) struct TestAgent {
    pub(crate) agent: ShutdownAgent,
    pub(crate) store: MemoryConfigStore,
    pub(crate) clock: Arc<ManualClock>,
    pub(crate) executor: Arc<RecordingExecutor>,
}

/// Agent backed by a memory store, a manual clock reading 12:00, and a recording
/// executor.
pub(crate) async fn create_test_agent(config: Config) -> TestAgent {
    create_test_agent_with_executor(config, RecordingExecutor::default()).await
}

pub(crate) async fn create_test_agent_with_executor(
    config: Config,
    executor: RecordingExecutor,
) -> TestAgent {
    let store = MemoryConfigStore::new(config);
    let clock = Arc::new(ManualClock::new(at(12, 0, 0)));
    let executor = Arc::new(executor);

    let agent = ShutdownAgent::new(Arc::new(store.clone()), executor.clone())
        .await
        .with_clock(clock.clone());

    TestAgent {
        agent,
        store,
        clock,
        executor,
    }
}
