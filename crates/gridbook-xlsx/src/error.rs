//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while loading or saving a workbook container
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the read codec
    #[error("Read error: {0}")]
    Read(#[from] calamine::Error),

    /// Error from the write codec
    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// File is not a usable workbook
    #[error("Invalid workbook: {0}")]
    InvalidFormat(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] gridbook_core::Error),
}
