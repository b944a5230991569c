//! Error types for shutdown-scheduler
//!
//! This module provides the error handling for the library:
//! - A crate-wide [`Error`] with a [`Result`] alias
//! - [`ConfigError`] for configuration loading, validation and persistence
//! - [`ExecutionError`] for the shutdown action itself
//!
//! Most failures in this crate are deliberately non-fatal. A malformed schedule entry
//! is dropped, a failed configuration reload keeps the previous snapshot, and a failed
//! shutdown is reported once and never retried. These types exist so the failures can
//! be reported with context instead of being swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shutdown-scheduler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for shutdown-scheduler
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (load, parse, validation, save)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The shutdown action failed
    #[error("shutdown failed: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The agent has been stopped and no longer accepts commands
    #[error("agent is stopped")]
    Stopped,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read {path}: {source}")]
    Read {
        /// The configuration file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::Config`]
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The configuration file that could not be parsed
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to write the configuration file
    #[error("failed to write {path}: {source}")]
    Write {
        /// The configuration file that could not be written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A setting holds a value outside its valid range
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// The configuration key that caused the error (e.g., "poll_interval")
        key: &'static str,
        /// Human-readable description of the problem
        message: String,
    },
}

/// Errors raised while invoking the OS shutdown action
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No shutdown command could be located on this system
    #[error("shutdown command not found: {0}")]
    CommandNotFound(String),

    /// The shutdown command could not be spawned
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that was being executed
        program: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The shutdown command ran but reported failure
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        /// The program that was executed
        program: PathBuf,
        /// Exit status description (e.g., "exit status: 1")
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`]
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            message: message.into(),
        }
    }
}
