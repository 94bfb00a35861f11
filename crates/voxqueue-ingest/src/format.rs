//! Input format detection and dispatch.

use crate::{IngestDefaults, IngestError, Ingested, Result, from_csv, from_json, from_text};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One request per non-empty line.
    Text,
    /// CSV with a header row.
    Csv,
    /// A JSON record or array of records.
    Json,
}

impl InputFormat {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Returns the format as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ingests `content` in the given format.
///
/// # Errors
///
/// Returns an error if the input as a whole cannot be read.
pub fn ingest(format: InputFormat, content: &str, defaults: &IngestDefaults) -> Result<Ingested> {
    match format {
        InputFormat::Text => Ok(from_text(content, defaults)),
        InputFormat::Csv => from_csv(content, defaults),
        InputFormat::Json => from_json(content, defaults),
    }
}

/// Reads and ingests a file.
///
/// The format is inferred from the extension unless given.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its format cannot be
/// inferred, or its content cannot be read as a whole.
pub fn ingest_file(
    path: &Path,
    format: Option<InputFormat>,
    defaults: &IngestDefaults,
) -> Result<Ingested> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| IngestError::UnknownFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|e| IngestError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), %format, "Ingesting input file");
    ingest(format, &content, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.txt")), Some(InputFormat::Text));
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.wav")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_ingest_file_infers_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("batch.csv");
        fs::write(&path, "text\nfirst\nsecond\n").unwrap();

        let ingested = ingest_file(&path, None, &IngestDefaults::default()).unwrap();
        assert_eq!(ingested.len(), 2);
    }

    #[test]
    fn test_ingest_file_explicit_format_overrides_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("batch.csv");
        fs::write(&path, "text\nfirst\n").unwrap();

        let ingested =
            ingest_file(&path, Some(InputFormat::Text), &IngestDefaults::default()).unwrap();
        let texts: Vec<_> = ingested.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["text", "first"]);
    }

    #[test]
    fn test_ingest_file_errors() {
        let temp_dir = TempDir::new().unwrap();

        let unknown = temp_dir.path().join("batch.bin");
        let err = ingest_file(&unknown, None, &IngestDefaults::default()).unwrap_err();
        assert!(matches!(err, IngestError::UnknownFormat(_)));

        let missing = temp_dir.path().join("missing.txt");
        let err = ingest_file(&missing, None, &IngestDefaults::default()).unwrap_err();
        assert!(matches!(err, IngestError::ReadFile { .. }));
    }
}
