//! Trait for shutdown execution

use crate::error::ExecutionError;
use async_trait::async_trait;

/// Performs the privileged shutdown action
///
/// Implementations must not retry on failure. The agent calls [`execute`](Self::execute)
/// at most once per expired countdown and reports an error to subscribers as-is.
///
/// # Examples
///
/// ```
/// use shutdown_scheduler::executor::{DryRunShutdownExecutor, ShutdownExecutor};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = DryRunShutdownExecutor;
/// executor.execute().await?;
/// assert_eq!(executor.name(), "dry-run");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ShutdownExecutor: Send + Sync {
    /// Shut the machine down
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No shutdown command is available
    /// - The command cannot be spawned (missing binary, permissions)
    /// - The command exits unsuccessfully
    async fn execute(&self) -> Result<(), ExecutionError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
