//! Reading and writing documents on disk.

mod file;

pub use file::{read_document, write_document};

use crate::svg::SvgError;
use thiserror::Error;

/// Storage errors. All of them are recoverable; hosts show the message as a
/// warning and keep the current document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Could not read document: {0}")]
    Parse(#[from] SvgError),
    #[error("No file path to save to")]
    NoFilePath,
    #[error("Cancelled")]
    Cancelled,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
