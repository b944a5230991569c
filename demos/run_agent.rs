//! Run the shutdown agent from a config file
//!
//! This example demonstrates the core functionality of shutdown-scheduler:
//! - Loading configuration from a JSON file
//! - Subscribing to countdown events
//! - Running the poll loop until Ctrl+C
//!
//! Pass `--dry-run` to log instead of powering off:
//!
//! ```text
//! cargo run --example run_agent -- config.json --dry-run
//! ```

use shutdown_scheduler::{
    DryRunShutdownExecutor, Event, JsonConfigStore, ShutdownAgent, Trigger,
    run_with_shutdown,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "config.json".to_string());
    let dry_run = args.any(|arg| arg == "--dry-run");

    let agent = if dry_run {
        ShutdownAgent::new(
            Arc::new(JsonConfigStore::new(&path)),
            Arc::new(DryRunShutdownExecutor),
        )
        .await
    } else {
        ShutdownAgent::from_path(&path).await
    };

    println!("Schedule: {:?}", agent.config().schedule_times);
    match agent.next_scheduled() {
        Some(next) => println!("Next shutdown: {}", next.format("%Y-%m-%d %H:%M")),
        None => println!("No valid shutdown times configured"),
    }

    // Subscribe to events
    let mut events = agent.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::CountdownStarted {
                    seconds_remaining,
                    trigger,
                    ..
                } => {
                    let cause = match trigger {
                        Trigger::Schedule { occurrence } => {
                            format!("scheduled for {}", occurrence.format("%H:%M"))
                        }
                        Trigger::Manual => "started manually".to_string(),
                    };
                    println!("Shutting down in {seconds_remaining}s ({cause})");
                }
                Event::CountdownTick {
                    seconds_remaining, ..
                } if seconds_remaining % 60 == 0 || seconds_remaining <= 10 => {
                    println!("  {seconds_remaining}s remaining");
                }
                Event::CountdownEnded { reason, .. } => {
                    println!("Countdown ended: {:?}", reason.terminal_state());
                }
                Event::ShutdownExecuted => println!("Shutdown command completed"),
                Event::ShutdownFailed { error } => eprintln!("Shutdown failed: {error}"),
                Event::ConfigReloadFailed { error } => eprintln!("Config reload failed: {error}"),
                _ => {}
            }
        }
    });

    // Poll until Ctrl+C
    run_with_shutdown(agent).await?;

    Ok(())
}
