//! Shutdown via an external command

use super::traits::ShutdownExecutor;
use crate::error::ExecutionError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Runs an external program to shut the machine down
///
/// The command must exit successfully for the shutdown to count as executed. Its
/// standard error is captured and included in the error otherwise.
///
/// # Examples
///
/// ```no_run
/// use shutdown_scheduler::executor::{CommandShutdownExecutor, ShutdownExecutor};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Explicit command
/// let executor = CommandShutdownExecutor::new(
///     PathBuf::from("/usr/bin/systemctl"),
///     vec!["poweroff".to_string()],
/// );
///
/// // Or the platform default, located on PATH
/// let executor = CommandShutdownExecutor::platform_default()?;
///
/// executor.execute().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CommandShutdownExecutor {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandShutdownExecutor {
    /// Create an executor that runs `program` with `args`
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform's shutdown command, located on PATH
    ///
    /// - Windows: `shutdown /s /t 0`
    /// - Linux: `systemctl poweroff`, falling back to `shutdown -h now`
    /// - Other Unix: `shutdown -h now`
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::CommandNotFound`] if none of the candidates is on PATH.
    pub fn platform_default() -> Result<Self, ExecutionError> {
        let candidates: Vec<(&str, Vec<&str>)> = if cfg!(windows) {
            vec![("shutdown", vec!["/s", "/t", "0"])]
        } else if cfg!(target_os = "linux") {
            vec![
                ("systemctl", vec!["poweroff"]),
                ("shutdown", vec!["-h", "now"]),
            ]
        } else {
            vec![("shutdown", vec!["-h", "now"])]
        };

        candidates
            .iter()
            .find_map(|(name, args)| {
                which::which(name).ok().map(|path| {
                    Self::new(path, args.iter().map(|arg| (*arg).to_string()).collect())
                })
            })
            .ok_or_else(|| {
                let names: Vec<&str> = candidates.iter().map(|(name, _)| *name).collect();
                ExecutionError::CommandNotFound(names.join(", "))
            })
    }

    /// The command as it would be typed in a shell, for logs and display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl ShutdownExecutor for CommandShutdownExecutor {
    async fn execute(&self) -> Result<(), ExecutionError> {
        tracing::info!(command = %self.command_line(), "Executing shutdown command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|source| ExecutionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
