//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a series file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The series file does not exist and the series may not start empty.
    #[error("Series file '{path}' not found")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Failed to create the data directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file exists but is not a valid key to number mapping.
    #[error("Malformed series file '{path}': {reason}")]
    Malformed {
        /// The offending file.
        path: PathBuf,
        /// What was wrong, naming the key when there is one.
        reason: String,
    },

    /// A value cannot be written as JSON.
    #[error("Cannot serialize '{path}': {reason}")]
    Serialize {
        /// The target file.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },
}

impl StoreError {
    /// Returns true if the error came from reading rather than writing.
    #[must_use]
    pub const fn is_load(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ReadFile { .. } | Self::Malformed { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
