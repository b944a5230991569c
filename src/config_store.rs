//! Configuration stores the poll loop reads from.
//!
//! The agent never holds on to a mutable settings object. It asks a [`ConfigStore`] for
//! a fresh [`Config`] snapshot every poll cycle, and if the store fails it keeps using
//! the last snapshot that loaded.
//!
//! - [`JsonConfigStore`] reads and writes a JSON file on disk.
//! - [`MemoryConfigStore`] holds a snapshot in memory, for embedding and tests.

use crate::config::Config;
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Source of configuration snapshots
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the current configuration
    ///
    /// Errors are reported to the caller, which decides whether to fall back to an
    /// earlier snapshot.
    async fn load(&self) -> Result<Config>;

    /// Human-readable description of where configuration comes from, for logs
    fn describe(&self) -> String;
}

/// Configuration stored as a JSON file
///
/// A missing file is not an error: it loads as [`Config::default`]. A file that exists
/// but cannot be read or parsed is an error.
///
/// # Examples
///
/// ```no_run
/// use shutdown_scheduler::config_store::{ConfigStore, JsonConfigStore};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = JsonConfigStore::new("/etc/shutdown-scheduler/config.json");
/// let config = store.load().await?;
/// println!("shutting down at {:?}", config.schedule_times);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate and write `config`, replacing the file atomically
    ///
    /// The JSON is written to a sibling temporary file and renamed over the target, so
    /// a concurrent [`load`](ConfigStore::load) sees either the old or the new file,
    /// never a partial one. Parent directories are created as needed.
    pub async fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;

        let json = serde_json::to_vec_pretty(config)?;
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        info!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<Config> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No configuration file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into());
            }
        };

        let config = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(config)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Configuration held in memory
///
/// Cloning shares the snapshot, so a clone kept by the caller can [`set`](Self::set)
/// a new configuration that the agent picks up on its next poll.
#[derive(Clone, Debug, Default)]
pub struct MemoryConfigStore {
    config: Arc<RwLock<Config>>,
}

impl MemoryConfigStore {
    /// Create a store serving `config`
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the served configuration
    pub fn set(&self, config: Config) {
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Config> {
        let config = match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(config)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
