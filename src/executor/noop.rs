//! Executors that never power off

use super::traits::ShutdownExecutor;
use crate::error::ExecutionError;
use async_trait::async_trait;

/// Executor used when no shutdown command is available
///
/// Every call fails with [`ExecutionError::CommandNotFound`], so an expired countdown is
/// reported to the user instead of silently doing nothing.
pub struct NoOpShutdownExecutor;

#[async_trait]
impl ShutdownExecutor for NoOpShutdownExecutor {
    async fn execute(&self) -> Result<(), ExecutionError> {
        Err(ExecutionError::CommandNotFound(
            "no shutdown command was found on PATH. \
             Set shutdown.program in the config file."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Executor that logs the shutdown and succeeds
pub struct DryRunShutdownExecutor;

#[async_trait]
impl ShutdownExecutor for DryRunShutdownExecutor {
    async fn execute(&self) -> Result<(), ExecutionError> {
        tracing::warn!("Dry run: countdown expired, skipping shutdown");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}
