//! OS shutdown execution
//!
//! The final step of an expired countdown is a single call to a [`ShutdownExecutor`].
//! Execution is one-shot and fail-visible: the caller reports an error to the user and
//! never retries.
//!
//! ## Implementations
//!
//! - [`CommandShutdownExecutor`]: runs an external shutdown command
//! - [`DryRunShutdownExecutor`]: logs instead of shutting down
//! - [`NoOpShutdownExecutor`]: stand-in when no shutdown command is available; every
//!   execution fails with [`ExecutionError::CommandNotFound`](crate::error::ExecutionError::CommandNotFound)
//!
//! [`from_config`] picks one from a [`ShutdownConfig`].
//!
//! ## Usage
//!
//! ```no_run
//! use shutdown_scheduler::executor::{CommandShutdownExecutor, ShutdownExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = CommandShutdownExecutor::platform_default()?;
//!     println!("will run: {}", executor.command_line());
//!     executor.execute().await?;
//!     Ok(())
//! }
//! ```

mod command;
mod noop;
mod traits;

pub use command::CommandShutdownExecutor;
pub use noop::{DryRunShutdownExecutor, NoOpShutdownExecutor};
pub use traits::ShutdownExecutor;

use crate::config::ShutdownConfig;
use std::sync::Arc;

/// Build the executor described by `config`
///
/// `dry_run` wins over everything else. An explicit `program` is used as given. With
/// neither, the platform's shutdown command is located on PATH; if it cannot be found
/// the agent still starts, and the failure surfaces when a countdown expires.
pub fn from_config(config: &ShutdownConfig) -> Arc<dyn ShutdownExecutor> {
    if config.dry_run {
        tracing::info!("Shutdown dry-run enabled, countdowns will not power off");
        return Arc::new(DryRunShutdownExecutor);
    }

    if let Some(program) = &config.program {
        return Arc::new(CommandShutdownExecutor::new(
            program.clone(),
            config.args.clone(),
        ));
    }

    match CommandShutdownExecutor::platform_default() {
        Ok(executor) => {
            tracing::debug!(command = %executor.command_line(), "Using platform shutdown command");
            Arc::new(executor)
        }
        Err(e) => {
            tracing::warn!(error = %e, "No shutdown command available, expiry will fail");
            Arc::new(NoOpShutdownExecutor)
        }
    }
}
