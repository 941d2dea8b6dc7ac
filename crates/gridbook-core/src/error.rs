//! Error types for gridbook-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridbook
#[derive(Debug, Error)]
pub enum Error {
    /// Unparseable cell or range reference
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Operation attempted before a workbook was created or loaded
    #[error("No workbook loaded")]
    NoWorkbookLoaded,

    /// Load path does not exist
    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    /// Attempted to delete the workbook's only remaining sheet
    #[error("Cannot delete the only sheet in the workbook: {0}")]
    LastSheet(String),

    /// Required argument was not supplied
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Error surfaced by the file-format codec
    #[error("Codec error: {0}")]
    Codec(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a codec error from any displayable source
    pub fn codec<E: std::fmt::Display>(err: E) -> Self {
        Error::Codec(err.to_string())
    }
}
