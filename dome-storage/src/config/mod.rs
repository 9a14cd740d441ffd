//! Configuration and dependency wiring for the operator tool.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use dome_storage_repository::{BackendSource, DirectorySink, StorageBackend, StorageManager};
use tracing::{info, warn};

use crate::errors::CliError;

/// Default directory holding the project documents.
const DEFAULT_STORAGE_DIR: &str = "./dome-storage";

/// Default directory backups are written to.
const DEFAULT_BACKUP_DIR: &str = ".";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse "pretty" or "json" (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub log_format: LogFormat,
    /// `LOG_FORMAT` value that was not recognized and replaced by the default.
    pub rejected_log_format: Option<String>,
}

impl Config {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DOME_STORAGE_DIR`: directory holding project documents (default: ./dome-storage)
    /// - `DOME_BACKUP_DIR`: directory backups are written to (default: .)
    /// - `LOG_FORMAT`: "pretty" or "json" (default: pretty, also used for
    ///   unrecognized values)
    ///
    /// Nothing is logged here because the subscriber is configured from the
    /// result; call [`Config::log_rejected`] once it is installed.
    pub fn from_env() -> Self {
        let storage_dir =
            env::var("DOME_STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string());
        let backup_dir =
            env::var("DOME_BACKUP_DIR").unwrap_or_else(|_| DEFAULT_BACKUP_DIR.to_string());

        let (log_format, rejected_log_format) = match env::var("LOG_FORMAT") {
            Ok(value) => match LogFormat::parse(&value) {
                Some(format) => (format, None),
                None => (LogFormat::Pretty, Some(value)),
            },
            Err(_) => (LogFormat::Pretty, None),
        };

        Self {
            storage_dir: PathBuf::from(storage_dir),
            backup_dir: PathBuf::from(backup_dir),
            log_format,
            rejected_log_format,
        }
    }

    /// Warn about settings that fell back to their defaults.
    pub fn log_rejected(&self) {
        if let Some(value) = &self.rejected_log_format {
            warn!(value = %value, "Invalid LOG_FORMAT, defaulting to 'pretty'");
        }
    }
}

/// Container for the initialized storage components.
pub struct Dependencies {
    pub backend: Arc<dyn StorageBackend>,
    pub manager: StorageManager,
    pub sink: DirectorySink,
}

impl Dependencies {
    /// Open the directory backend described by `config`.
    pub fn new(config: &Config) -> Result<Self, CliError> {
        let backend = BackendSource::directory(config.storage_dir.clone()).into_backend()?;
        info!(
            storage_dir = %config.storage_dir.display(),
            backup_dir = %config.backup_dir.display(),
            "Storage opened"
        );
        Ok(Self::with_backend(backend, DirectorySink::new(config.backup_dir.clone())))
    }

    /// Wire the components around an existing backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>, sink: DirectorySink) -> Self {
        Self {
            manager: StorageManager::new(backend.clone()),
            backend,
            sink,
        }
    }
}
