//! Error types for papercache

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error types for cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory could not be created or listed
    #[error("Cache storage error: {0}")]
    Storage(String),

    /// Stored entry could not be parsed
    #[error("Corrupt cache entry '{key}': {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Conflicting CLI actions
    #[error("Action conflict: specify only one of --sweep, --clear, or --fingerprint")]
    ActionConflict,

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
