//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; missing values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ASPIRE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ASPIRE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ASPIRE_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "aspire_tracker.sqlite3";

/// Where the tracker keeps its data and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl TrackerConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Applies explicit values (command-line flags) over the resolved ones.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(log_level) = log_level.filter(|level| !level.trim().is_empty()) {
            self.log_level = log_level.trim().to_string();
        }
        if let Some(log_dir) = log_dir {
            self.log_dir = Some(log_dir);
        }
        self
    }
}
