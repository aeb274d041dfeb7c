//! Common error types used throughout filevault.
//!
//! This module provides a unified error type covering configuration faults,
//! missing entries, bad caller input, image decoding, storage adapters and
//! the persistence layer.

use std::fmt;

/// Common error type for filevault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration is malformed (bad template, bad sharding settings).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested entry was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entry (e.g. "version", "adapter").
        entity: String,
        /// The key that was looked up.
        id: String,
    },

    /// The caller supplied an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An image could not be read or measured.
    #[error("Image error: {0}")]
    Image(String),

    /// A storage adapter operation failed.
    #[error("Storage error [{adapter}]: {message}")]
    Storage {
        /// Name of the adapter that failed.
        adapter: String,
        /// Human-readable error description.
        message: String,
    },

    /// The persistence layer reported a failure.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new InvalidArgument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new Image error.
    pub fn image<S: Into<String>>(msg: S) -> Self {
        Self::Image(msg.into())
    }

    /// Create a new Storage error.
    pub fn storage(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Create a new Persistence error.
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        Self::Persistence(msg.into())
    }

    /// Whether this error is a [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
