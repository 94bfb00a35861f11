//! Error types for ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that prevent an input from being read at all.
///
/// Problems with individual records are reported as [`RecordError`]s in the
/// ingestion report instead.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Failed to read an input file.
    #[error("Failed to read input file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("Failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON document is neither a record nor a list of records.
    #[error("Expected a JSON object or array of objects, found {0}")]
    UnexpectedJson(&'static str),

    /// The CSV header row could not be read.
    #[error("Failed to read CSV header: {0}")]
    CsvHeader(#[from] csv::Error),

    /// The input format could not be determined.
    #[error("Cannot infer input format for '{0}' (expected .txt, .csv or .json)")]
    UnknownFormat(PathBuf),
}

/// Reasons a single record was left out of an ingested batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The record has no text, or only whitespace.
    #[error("missing text")]
    MissingText,

    /// A clone-mode record names neither a voice profile nor reference audio.
    #[error("clone voice requires voice_profile_id or reference_audio")]
    MissingCloneSource,

    /// A numeric column holds a value that is not a number.
    #[error("invalid number in column '{column}': {value:?}")]
    InvalidNumber {
        /// Column name.
        column: String,
        /// Raw cell value.
        value: String,
    },

    /// The record could not be decoded.
    #[error("malformed record: {0}")]
    Malformed(String),
}
