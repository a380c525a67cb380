/// Error types for scan-recall
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for scan-recall operations
#[derive(Error, Debug)]
pub enum ScanError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored entry could not be read or parsed
    #[error("Storage read failed for '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    /// Write call rejected by the storage layer
    #[error("Storage write failed for '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown settings name or value
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Browser collaborator refused to open a URL
    #[error("Could not open '{0}'")]
    Browser(String),

    /// History index out of range
    #[error("No scan at position {0}")]
    ScanNotFound(usize),
}

/// Result type alias for scan-recall operations
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    pub(crate) fn read(key: &str, reason: impl ToString) -> Self {
        ScanError::StorageRead {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl ToString) -> Self {
        ScanError::StorageWrite {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Convert ScanError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            ScanError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            ScanError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            ScanError::StorageRead { key, .. } => {
                format!("Could not read saved '{}' data", key)
            }
            ScanError::StorageWrite { key, .. } => {
                format!("Could not save '{}' data", key)
            }
            ScanError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            ScanError::InvalidSetting(msg) => {
                format!("Unknown setting or value: {}", msg)
            }
            ScanError::Browser(url) => {
                format!("Could not open link: {}", url)
            }
            ScanError::ScanNotFound(index) => {
                format!("There is no scan number {} in the history", index)
            }
        }
    }
}
