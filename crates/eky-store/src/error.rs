//! Error types for store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving, or mutating the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the backing file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the backing file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the directory holding the backing file.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not valid JSON.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file holds valid JSON that is not an object.
    #[error("invalid data in {path}: expected a JSON object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    /// Failed to serialize the document to JSON.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// A mutation was applied in memory but could not be written back.
    #[error("failed to persist key '{key}': {source}")]
    Persist {
        key: String,
        #[source]
        source: Box<StoreError>,
    },

    /// The user's home directory could not be determined.
    #[error("could not determine home directory")]
    HomeDirUnavailable,
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
