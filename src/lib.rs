//! # shutdown-scheduler
//!
//! A background agent that powers the machine off at configured times of day, after
//! a cancellable countdown.
//!
//! ## How it works
//!
//! - The configuration lists daily shutdown times as `"HH:mm"` strings.
//! - A poll loop wakes every poll interval (default 60s), reloads the configuration,
//!   and checks whether now is within the tolerance window (default ±30s) of a
//!   scheduled time.
//! - A match starts a countdown (default 10 minutes). While it runs, the user can
//!   cancel it or skip straight to shutdown.
//! - When the countdown reaches zero, the shutdown command runs exactly once.
//!
//! Progress is published as [`Event`]s on a broadcast channel, so a tray icon, a
//! notification window or a log can follow along without the agent waiting on them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use shutdown_scheduler::{ShutdownAgent, run_with_shutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = ShutdownAgent::from_path("config.json").await;
//!
//!     // Subscribe to events
//!     let mut events = agent.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Poll until SIGTERM/SIGINT
//!     run_with_shutdown(agent).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// The shutdown agent (decomposed into focused submodules)
pub mod agent;
/// Sources of the current time
pub mod clock;
/// Configuration types
pub mod config;
/// Configuration persistence
pub mod config_store;
/// The countdown state machine
pub mod countdown;
/// Error types
pub mod error;
/// Shutdown executors
pub mod executor;
/// Time-of-day parsing and schedule evaluation
pub mod scheduler;
/// The schedule poll loop
pub mod scheduler_task;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use agent::ShutdownAgent;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ShutdownConfig};
pub use config_store::{ConfigStore, JsonConfigStore, MemoryConfigStore};
pub use countdown::{Countdown, Transition};
pub use error::{ConfigError, Error, ExecutionError, Result};
pub use executor::{
    CommandShutdownExecutor, DryRunShutdownExecutor, NoOpShutdownExecutor, ShutdownExecutor,
};
pub use scheduler::{ParseTimeOfDayError, Schedule, TimeOfDay, next_occurrence};
pub use scheduler_task::{PollOutcome, PollTask};
pub use types::{CountdownState, CountdownStatus, EndReason, Event, SessionId, Trigger};

/// Helper function to run the agent with graceful signal handling.
///
/// Starts the poll loop, waits for a termination signal, then stops the agent (which
/// cancels any running countdown) and waits for the poll loop to exit.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use shutdown_scheduler::{ShutdownAgent, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let agent = ShutdownAgent::from_path("config.json").await;
///
///     // Run with automatic signal handling
///     run_with_shutdown(agent).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(agent: ShutdownAgent) -> Result<()> {
    let poll_loop = agent.start_poll_loop();

    let signal = wait_for_signal().await;
    tracing::info!(signal, "Shutdown agent received stop signal");
    agent.stop().await;

    poll_loop.await.map_err(|e| {
        Error::Io(std::io::Error::other(format!("poll loop panicked: {e}")))
    })
}

/// Wait for SIGTERM or SIGINT and return the name of the one that arrived
#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, sandboxes)
    let register = |kind, name: &'static str| match signal(kind) {
        Ok(stream) => Some(stream),
        Err(e) => {
            tracing::warn!(error = %e, signal = name, "Shutdown agent cannot watch for signal");
            None
        }
    };
    let sigterm = register(SignalKind::terminate(), "SIGTERM");
    let sigint = register(SignalKind::interrupt(), "SIGINT");

    match (sigterm, sigint) {
        (Some(mut sigterm), Some(mut sigint)) => tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        },
        (Some(mut sigterm), None) => {
            sigterm.recv().await;
            "SIGTERM"
        }
        (None, Some(mut sigint)) => {
            sigint.recv().await;
            "SIGINT"
        }
        (None, None) => wait_for_ctrl_c().await,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Shutdown agent cannot listen for Ctrl+C, stopping now");
    }
    "Ctrl+C"
}
