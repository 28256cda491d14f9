// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration transaction management with automatic backups
//!
//! Provides atomic write operations for the config file.

use atomic_write_file::AtomicWriteFile;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::{json, ConfigError, ConfigManager, ConfigValidator, ValidationLevel, ValidationReport};
use crate::core::Config;

/// Atomic configuration transaction with automatic backup.
///
/// - **Atomic**: the new file replaces the old one in a single rename
/// - **Consistent**: the config is never half-written
/// - **Durable**: the previous file is backed up before anything changes
///
/// # Lifecycle
///
/// 1. `begin()` - Backs up the current file (if any) immediately
/// 2. `commit_config()` / `commit()` - Writes atomically, once
/// 3. `rollback()` - Restores the state from before `begin()`
///
/// # Example
///
/// ```no_run
/// use overlay_hotkeys::config::{ConfigManager, ConfigTransaction};
/// use overlay_hotkeys::core::Config;
/// use std::path::PathBuf;
///
/// let manager = ConfigManager::new(PathBuf::from("config.json"));
/// let mut tx = ConfigTransaction::begin(&manager)?;
///
/// match tx.commit_config(&Config::default()) {
///     Ok(report) => println!("Saved with {} warning(s)", report.warning_count()),
///     Err(e) => {
///         eprintln!("Save failed: {}", e);
///         tx.rollback()?;
///     }
/// }
/// # Ok::<(), overlay_hotkeys::config::ConfigError>(())
/// ```
pub struct ConfigTransaction<'a> {
    manager: &'a ConfigManager,
    /// `None` when the file did not exist at `begin()`
    backup_path: Option<PathBuf>,
    committed: bool,
}

impl<'a> ConfigTransaction<'a> {
    /// Begins a new transaction by backing up the current file.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup cannot be written; nothing has
    /// changed in that case.
    pub fn begin(manager: &'a ConfigManager) -> Result<Self, ConfigError> {
        let backup_path = manager.create_timestamped_backup()?;

        Ok(Self {
            manager,
            backup_path,
            committed: false,
        })
    }

    /// Backup taken at `begin()`, if the file existed.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Validates `config` and writes it.
    ///
    /// 1. Runs the config validator (bindings, profiles, conflicts, tuning)
    /// 2. Blocks on Error-level issues
    /// 3. Logs warnings and conflicts, which never block
    /// 4. Serialises to JSON and commits atomically
    ///
    /// # Returns
    ///
    /// * `Ok(ValidationReport)` - Written; the report lists warnings and conflicts
    /// * `Err(ConfigError::ValidationFailed)` - Error-level issues, nothing written
    /// * `Err(ConfigError::AlreadyCommitted)` - This transaction already wrote
    pub fn commit_config(&mut self, config: &Config) -> Result<ValidationReport, ConfigError> {
        if self.committed {
            return Err(ConfigError::AlreadyCommitted);
        }

        let report = ConfigValidator::new().validate(config);

        if report.has_errors() {
            for issue in report.issues_at(ValidationLevel::Error) {
                tracing::error!(%issue, "config validation error");
            }
            return Err(ConfigError::ValidationFailed(format!(
                "{} validation error(s) detected",
                report.error_count()
            )));
        }

        for issue in report.issues_at(ValidationLevel::Warning) {
            tracing::warn!(%issue, "config warning");
        }

        let content = json::to_string_pretty(config)?;
        self.commit(&content)?;
        Ok(report)
    }

    /// Writes `new_content` atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// `AlreadyCommitted` on a second call; `WriteFailed` if the temp file
    /// cannot be written or renamed, in which case the original file is
    /// untouched.
    pub fn commit(&mut self, new_content: &str) -> Result<(), ConfigError> {
        if self.committed {
            return Err(ConfigError::AlreadyCommitted);
        }

        if let Some(parent) = self.manager.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        write_atomic(&self.manager.config_path, new_content.as_bytes())?;
        self.committed = true;

        tracing::info!(path = %self.manager.config_path.display(), "config saved");
        Ok(())
    }

    /// Restores the file to its state at `begin()`.
    ///
    /// If there was no file then, the written file is removed. Can be
    /// called more than once.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        match &self.backup_path {
            Some(backup_path) => {
                let backup_content = fs::read(backup_path)?;
                write_atomic(&self.manager.config_path, &backup_content)?;
                tracing::info!(backup = %backup_path.display(), "config rolled back");
            }
            None => {
                if self.manager.config_path.exists() {
                    fs::remove_file(&self.manager.config_path)?;
                }
                tracing::info!("config rolled back (removed new file)");
            }
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
