//! Error types for the noteforge application.
//!
//! The note collection core never fails: corrupt data and rejected writes
//! degrade to empty defaults. These errors belong to the fallible edges
//! around it (the byte store, configuration, the CLI and the editor).

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the noteforge application.
#[derive(Error, Debug)]
pub enum NoteError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key-value store refused a write because it would exceed its quota.
    #[error("Storage quota exceeded writing {key}: {requested} bytes requested, {quota} allowed")]
    QuotaExceeded {
        key: String,
        requested: usize,
        quota: usize,
    },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
