//! Store configuration.
//!
//! # Responsibility
//! - Describe where the contacts database lives and how long a handle waits
//!   on a locked file before giving up.
//!
//! # Invariants
//! - `db_path` is never empty.
//! - `busy_timeout` applies to every handle opened from this configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the default database location.
pub const DB_PATH_ENV: &str = "GEOCONTACT_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "geocontact.sqlite3";
/// Busy timeout applied when no explicit value is configured.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location and locking policy for the contacts database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the given database file with the default
    /// busy timeout (5 seconds).
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Resolves the database path from `GEOCONTACT_DB_PATH`.
    ///
    /// Falls back to `<temp_dir>/geocontact.sqlite3` when the variable is
    /// unset or blank.
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        Self::new(path)
    }

    /// Overrides how long a handle waits for a competing lock.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}
