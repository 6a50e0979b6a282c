//! Error types for the configuration core.
//!
//! Lower layers never decide process exit; they return these typed
//! failures and the CLI dispatcher maps them to exit codes and
//! user-facing messages.

use std::path::Path;

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for configuration operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The config file exists but could not be parsed. Callers are
    /// expected to warn and continue as if the file were absent.
    #[error("config file {path} is corrupt: {message}")]
    ConfigCorrupt { path: String, message: String },

    /// Wrong password, or the stored blob failed its integrity or
    /// format checks. Never carries partial plaintext.
    #[error("decryption failed: wrong password or corrupted data")]
    Decryption,

    /// No source supplied the credential.
    #[error("{0}")]
    MissingCredential(String),

    /// Filesystem read/write failure, with the offending path.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A migration was invoked without its required source present.
    #[error("{0}")]
    Precondition(String),

    /// Invalid user input (e.g. a too-short encryption password).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
