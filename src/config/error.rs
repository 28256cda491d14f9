use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration management.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    /// Config path has no file name or parent directory.
    #[error("Invalid config path: {0}")]
    InvalidPath(PathBuf),
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Attempted to commit a transaction twice.
    #[error("Transaction already committed")]
    AlreadyCommitted,
    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Config contains Error-level validation issues.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// Config file is not valid JSON or does not fit the schema.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// File watcher could not be set up.
    #[error("Failed to watch config: {0}")]
    Watch(#[from] notify::Error),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
