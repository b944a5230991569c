//! Common test utilities for shutdown-scheduler integration tests

use chrono::{DateTime, Local, TimeZone};
use shutdown_scheduler::{Config, Event, JsonConfigStore};
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

/// A local instant on a summer date with no DST transition nearby
pub fn local(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 15, hour, minute, second)
        .earliest()
        .unwrap()
}

/// Write `config` as the JSON file at `path` and return a store for it
pub async fn write_config(path: &Path, config: &Config) -> JsonConfigStore {
    let store = JsonConfigStore::new(path);
    store.save(config).await.unwrap();
    store
}

/// Wait until an event matching `predicate` arrives, collecting everything seen
///
/// Returns `None` on timeout or if the channel closes first.
pub async fn wait_for_event<F>(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    predicate: F,
) -> Option<Vec<Event>>
where
    F: Fn(&Event) -> bool,
{
    let mut seen = Vec::new();
    let outcome = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let done = predicate(&event);
                    seen.push(event);
                    if done {
                        return Some(());
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await;

    match outcome {
        Ok(Some(())) => Some(seen),
        _ => None,
    }
}
