/// Runtime configuration
///
/// Resolved once at startup from the environment. Everything has a default,
/// so a bare `Config::from_env()` works on a fresh machine.

use crate::error::{Result, ScanError};
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the data directory
pub const HOME_ENV: &str = "SCAN_RECALL_HOME";
/// Overrides the history polling interval, in milliseconds
pub const POLL_ENV: &str = "SCAN_RECALL_POLL_MS";

const DATA_DIR_NAME: &str = ".scan-recall";
const DB_FILE_NAME: &str = "scans.db";
const DEFAULT_POLL_MS: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(HOME_ENV) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or_else(|| ScanError::Config("could not find home directory".to_string()))?
                .join(DATA_DIR_NAME),
        };

        let poll_ms = match lookup(POLL_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| {
                    ScanError::Config(format!("{} must be a positive integer, got '{}'", POLL_ENV, raw))
                })?,
            None => DEFAULT_POLL_MS,
        };

        Ok(Self {
            data_dir,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
