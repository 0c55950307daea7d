//! Error types for citebib-core

use thiserror::Error;

/// Errors from a persistence adapter or the snapshot codec
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Underlying storage failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored snapshot could not be decoded
    #[error("Corrupt snapshot under key {key}: {message}")]
    Corrupt { key: String, message: String },

    /// The collection could not be serialized
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    /// The background writer has shut down
    #[error("Persistence writer is no longer running")]
    WriterClosed,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: String, message: String },

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
