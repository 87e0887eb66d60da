//! Error types for document serialization and storage.
//!
//! A missing file and a file that does not parse are distinct failure
//! modes: callers present "no manual yet" differently from "manual is
//! corrupt".

use thiserror::Error;

/// Errors that can occur while reading or writing manual documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure other than absence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No document exists yet for the requested command.
    #[error("no manual document found for command '{0}'")]
    NotFound(String),

    /// Stored document does not parse as a well-formed manual tree.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
