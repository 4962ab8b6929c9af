//! Host configuration resolved from environment variables.
//!
//! # Responsibility
//! - Collect store, session and logging settings in one place.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - The shared password is only required by operations that need it.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB: &str = "FAMTREE_DB";
pub const ENV_SESSION_FILE: &str = "FAMTREE_SESSION_FILE";
pub const ENV_PASSWORD: &str = "FAMTREE_PASSWORD";
pub const ENV_LOG_LEVEL: &str = "FAMTREE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FAMTREE_LOG_DIR";

const DEFAULT_DB_FILE: &str = "famtree.sqlite3";
const DEFAULT_SESSION_FILE: &str = ".famtree_session";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `FAMTREE_PASSWORD` is not set.
    MissingPassword,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPassword => write!(f, "{ENV_PASSWORD} must be set"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub session_file: PathBuf,
    pub shared_password: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one call per key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            session_file: read(ENV_SESSION_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            shared_password: read(ENV_PASSWORD),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR),
        }
    }

    /// Returns the shared password or `MissingPassword`.
    pub fn require_password(&self) -> Result<&str, ConfigError> {
        self.shared_password
            .as_deref()
            .ok_or(ConfigError::MissingPassword)
    }
}
