//! Storage Configuration
//!
//! Backend selection and per-backend settings, read from the environment
//! by the binary at startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BoardError, BoardResult};

/// Default snapshot interval for the file backend (5 minutes)
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// In-memory collections snapshotted to a JSON file
    #[default]
    Json,
    /// PostgreSQL behind a connection pool
    Postgres,
}

impl StorageBackend {
    /// Parse a configuration value; anything unknown is an
    /// unsupported-backend error surfaced at startup
    pub fn from_config(value: &str) -> BoardResult<Self> {
        match value {
            "json" => Ok(Self::Json),
            "postgres" => Ok(Self::Postgres),
            other => Err(BoardError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding the snapshot file (file backend)
    pub data_dir: PathBuf,
    /// Snapshot file name (file backend)
    pub snapshot_file: String,
    /// Interval between background snapshot writes (file backend)
    pub save_interval: Duration,
    /// Connection string (relational backend)
    pub database_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            data_dir: PathBuf::from("data"),
            snapshot_file: "board.json".to_string(),
            save_interval: DEFAULT_SAVE_INTERVAL,
            database_url: None,
        }
    }
}

impl StorageConfig {
    /// Build from environment variables
    ///
    /// `BOARD_BACKEND` (`json` | `postgres`), `BOARD_DATA_DIR`,
    /// `BOARD_SNAPSHOT_FILE`, `BOARD_SAVE_INTERVAL_SECS`, `DATABASE_URL`.
    pub fn from_env() -> BoardResult<Self> {
        let defaults = Self::default();

        let backend = match std::env::var("BOARD_BACKEND") {
            Ok(value) => StorageBackend::from_config(&value)?,
            Err(_) => defaults.backend,
        };

        let data_dir = std::env::var("BOARD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let snapshot_file =
            std::env::var("BOARD_SNAPSHOT_FILE").unwrap_or(defaults.snapshot_file);

        let save_interval = std::env::var("BOARD_SAVE_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.save_interval);

        let database_url = std::env::var("DATABASE_URL").ok();

        Ok(Self {
            backend,
            data_dir,
            snapshot_file,
            save_interval,
            database_url,
        })
    }
}
