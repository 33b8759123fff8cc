//! Runtime configuration resolved from the environment.
//!
//! Blank or unset variables fall back to defaults under the system temp
//! directory, so shells can run without any setup.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "NUTRILABEL_DB_PATH";
pub const LOG_DIR_ENV: &str = "NUTRILABEL_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "NUTRILABEL_LOG_LEVEL";
pub const ANALYZER_URL_ENV: &str = "NUTRILABEL_ANALYZER_URL";

const DB_FILE_NAME: &str = "nutrilabel.sqlite3";
const LOG_DIR_NAME: &str = "nutrilabel-logs";
pub const DEFAULT_ANALYZER_URL: &str = "https://csu-nutrition-arda.free.beeceptor.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value storage.
    pub db_path: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Base URL of the photo estimator.
    pub analyzer_url: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DB_FILE_NAME),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            analyzer_url: DEFAULT_ANALYZER_URL.to_string(),
        }
    }
}

impl CoreConfig {
    /// Reads `NUTRILABEL_*` variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_dir: read(LOG_DIR_ENV).map_or(defaults.log_dir, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            analyzer_url: read(ANALYZER_URL_ENV).unwrap_or(defaults.analyzer_url),
        }
    }
}
