//! Configuration file management with atomic writes and backup support.
//!
//! This module loads and saves the overlay's JSON config. Key features:
//!
//! - **Lenient reads**: case-insensitive field names, defaults for missing
//!   fields, unknown fields ignored
//! - **Atomic writes**: Uses temp-file-then-rename to prevent corruption
//! - **Automatic backups**: Every save backs up the previous file first
//! - **Conflict reporting**: Saves report binding conflicts without
//!   refusing them
//!
//! # Example
//!
//! ```no_run
//! use overlay_hotkeys::config::ConfigManager;
//!
//! let manager = ConfigManager::from_user_path("~/.config/overlay-hotkeys/config.json");
//! let mut config = manager.load_or_default()?;
//! config.cursor_detection.enabled = true;
//!
//! let report = manager.save(&config)?;
//! println!("{} conflict(s)", report.conflicts.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod json;
pub mod transaction;
pub mod validator;
pub mod watcher;

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Config;

pub use error::ConfigError;
pub use transaction::ConfigTransaction;
pub use validator::{ConfigValidator, ValidationIssue, ValidationLevel, ValidationReport};
pub use watcher::ConfigWatcher;

/// Default config location, before `~` expansion
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/overlay-hotkeys/config.json";

/// Expands `~` and environment variables in a user-supplied path.
///
/// Falls back to the literal path if expansion fails (e.g. unset variable).
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            tracing::warn!(path, error = %e, "could not expand config path");
            PathBuf::from(path)
        }
    }
}

/// Loads and saves the overlay config file.
///
/// All writes go through [`ConfigTransaction`] so the previous file is
/// backed up and the new one replaces it atomically.
#[derive(Debug)]
pub struct ConfigManager {
    /// Path to the JSON config file.
    pub(crate) config_path: PathBuf,
    backup_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the given config file.
    ///
    /// The file does not have to exist yet; [`load`](Self::load) reports
    /// `NotFound` and [`save`](Self::save) creates it. Backups go to a
    /// `backups/` directory next to the file.
    pub fn new(config_path: PathBuf) -> Self {
        let backup_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("backups");

        Self {
            config_path,
            backup_dir,
        }
    }

    /// Creates a manager for a path that may contain `~` or `$VARS`.
    pub fn from_user_path(path: &str) -> Self {
        Self::new(expand_path(path))
    }

    /// Manager for [`DEFAULT_CONFIG_PATH`].
    pub fn default_location() -> Self {
        Self::from_user_path(DEFAULT_CONFIG_PATH)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Reads the raw config file content.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` if the file is missing, `ConfigError::Io`
    /// for any other read failure.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        Ok(fs::read_to_string(&self.config_path)?)
    }

    /// Loads and parses the config.
    ///
    /// An empty profile list is replaced with the built-in default profile.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let content = self.read_config()?;
        let mut config = json::from_str(&content)?;
        config.ensure_profile();

        tracing::info!(
            path = %self.config_path.display(),
            profiles = config.profiles.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Loads the config, or returns the defaults if the file is missing.
    ///
    /// Parse errors are still returned: a broken file is never silently
    /// replaced with defaults.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound(path)) => {
                tracing::info!(path = %path.display(), "no config file; using defaults");
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Validates and writes `config` through a transaction.
    ///
    /// Returns the validation report, including any binding conflicts.
    /// Conflicts and warnings never block the save; Error-level issues do.
    pub fn save(&self, config: &Config) -> Result<ValidationReport, ConfigError> {
        let mut tx = ConfigTransaction::begin(self)?;
        tx.commit_config(config)
    }

    /// Starts a transaction, backing up the current file if there is one.
    pub fn begin_transaction(&self) -> Result<ConfigTransaction<'_>, ConfigError> {
        ConfigTransaction::begin(self)
    }

    /// Copies the current file into the backup directory.
    ///
    /// Backup name is `<file name>.<YYYY-MM-DD_HHMMSS>`. Returns `None`
    /// when there is no file to back up yet.
    pub(crate) fn create_timestamped_backup(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.config_path.exists() {
            return Ok(None);
        }
        let content = fs::read(&self.config_path)?;

        if !self.backup_dir.exists() {
            fs::create_dir_all(&self.backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(self.backup_dir.clone()))?;
        }

        let original_name = self
            .config_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConfigError::InvalidPath(self.config_path.clone()))?;

        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("{}.{}", original_name, timestamp));

        fs::write(&backup_path, content)
            .map_err(|e| ConfigError::BackupFailed(format!("{}: {}", backup_path.display(), e)))?;

        tracing::debug!(backup = %backup_path.display(), "config backed up");
        Ok(Some(backup_path))
    }

    /// Backups of this config, oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }
        let Some(name) = self.config_path.file_name().and_then(|n| n.to_str()) else {
            return Err(ConfigError::InvalidPath(self.config_path.clone()));
        };
        let prefix = format!("{}.", name);

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        // Timestamps sort lexically
        backups.sort();
        Ok(backups)
    }
}
