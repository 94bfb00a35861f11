//! Error types for archive export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while writing an archive.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to create the archive file.
    #[error("Failed to create archive '{path}': {source}")]
    CreateArchive {
        /// The archive path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a generated output file.
    #[error("Failed to read output file '{path}': {source}")]
    ReadOutput {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write archive data.
    #[error("Failed to write archive entry '{name}': {source}")]
    WriteEntry {
        /// The entry name.
        name: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The ZIP encoder failed.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
