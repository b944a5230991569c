use super::test_helpers::{
    FlakyConfigStore, RecordingExecutor, TestAgent, at, create_test_agent,
    create_test_agent_with_executor, test_config,
};
use super::*;
use crate::countdown::{CountdownState, EndReason, Transition};
use crate::error::Error;
use crate::types::Trigger;
use std::time::Duration;
use tokio::sync::broadcast;


/// Everything currently buffered on `rx`
fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Events other than per-second ticks
fn milestones(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|e| !matches!(e, Event::CountdownTick { .. }))
        .collect()
}
