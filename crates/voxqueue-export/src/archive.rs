//! ZIP archive writer.

use crate::error::{ExportError, Result};
use crate::naming::{DEFAULT_PREFIX_CHARS, entry_name};
use std::fs::File;
use std::io::{BufReader, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use voxqueue_types::{ItemId, ItemStatus, QueueItem};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// One file written into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name inside the archive.
    pub name: String,
    /// The item the audio belongs to.
    pub item_id: ItemId,
    /// Path the audio was read from.
    pub source: PathBuf,
}

/// Outcome of an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Entries written, in archive order.
    pub entries: Vec<ArchiveEntry>,
    /// Completed items whose output file was missing.
    pub skipped: Vec<ItemId>,
}

impl ExportSummary {
    /// Returns the number of entries written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Writes the outputs of completed items into a ZIP archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveExporter {
    prefix_chars: usize,
    compression: CompressionMethod,
}

impl Default for ArchiveExporter {
    fn default() -> Self {
        Self {
            prefix_chars: DEFAULT_PREFIX_CHARS,
            compression: CompressionMethod::Deflated,
        }
    }
}

impl ArchiveExporter {
    /// Creates an exporter with deflate compression and 30-character names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many characters of item text go into entry names.
    #[must_use]
    pub const fn with_prefix_chars(mut self, prefix_chars: usize) -> Self {
        self.prefix_chars = prefix_chars;
        self
    }

    /// Stores entries without compression.
    #[must_use]
    pub const fn stored(mut self) -> Self {
        self.compression = CompressionMethod::Stored;
        self
    }

    /// Writes the archive to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or an output cannot
    /// be read.
    pub fn export_to_path(&self, items: &[QueueItem], path: &Path) -> Result<ExportSummary> {
        let file = File::create(path).map_err(|source| ExportError::CreateArchive {
            path: path.to_path_buf(),
            source,
        })?;
        let summary = self.write_archive(items, file)?;
        info!(
            archive = %path.display(),
            entries = summary.len(),
            skipped = summary.skipped.len(),
            "Archive written"
        );
        Ok(summary)
    }

    /// Writes the archive into `writer`.
    ///
    /// Only COMPLETED items with an output are considered, in slice order.
    /// Entries are numbered from 1 over the files actually written, so an
    /// output missing from disk is listed in [`ExportSummary::skipped`] and
    /// does not leave a gap in the numbering.
    ///
    /// # Errors
    ///
    /// Returns an error if an output exists but cannot be read, or if the
    /// ZIP encoder fails.
    pub fn write_archive<W: Write + Seek>(
        &self,
        items: &[QueueItem],
        writer: W,
    ) -> Result<ExportSummary> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(self.compression);
        let mut summary = ExportSummary::default();

        for item in items.iter().filter(|i| i.status == ItemStatus::Completed) {
            let Some(output) = &item.output else {
                continue;
            };
            let source = output.path();
            if !source.is_file() {
                debug!(item = %item.id, path = %source.display(), "Output missing, skipping");
                summary.skipped.push(item.id);
                continue;
            }

            let Some(name) = entry_name(summary.len() + 1, item, self.prefix_chars) else {
                continue;
            };
            let file = File::open(source).map_err(|source_err| ExportError::ReadOutput {
                path: source.to_path_buf(),
                source: source_err,
            })?;

            zip.start_file(name.as_str(), options)?;
            std::io::copy(&mut BufReader::new(file), &mut zip).map_err(|source_err| {
                ExportError::WriteEntry {
                    name: name.clone(),
                    source: source_err,
                }
            })?;

            summary.entries.push(ArchiveEntry {
                name,
                item_id: item.id,
                source: source.to_path_buf(),
            });
        }

        zip.finish()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;
    use voxqueue_types::GeneratedAudio;
    use zip::ZipArchive;

    fn completed(dir: &TempDir, text: &str, file: &str, bytes: Option<&[u8]>) -> QueueItem {
        let path = dir.path().join(file);
        if let Some(bytes) = bytes {
            std::fs::write(&path, bytes).unwrap();
        }
        let mut item = QueueItem::new(text);
        item.mark_processing();
        item.mark_completed(GeneratedAudio::new(path, 1.0));
        item
    }

    fn read_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_write_archive_names_and_contents() {
        let dir = TempDir::new().unwrap();
        let items = vec![
            completed(&dir, "Hello, world!", "a.wav", Some(b"first")),
            completed(&dir, "Second line", "b.wav", Some(b"second")),
        ];

        let mut buffer = Cursor::new(Vec::new());
        let summary = ArchiveExporter::new()
            .write_archive(&items, &mut buffer)
            .unwrap();

        assert_eq!(summary.len(), 2);
        assert!(summary.skipped.is_empty());
        assert_eq!(summary.entries[0].item_id, items[0].id);

        let bytes = buffer.into_inner();
        assert_eq!(
            read_names(bytes.clone()),
            vec!["001_Hello world.wav", "002_Second line.wav"]
        );

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("002_Second line.wav")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_missing_outputs_are_skipped_without_gaps() {
        let dir = TempDir::new().unwrap();
        let missing = completed(&dir, "gone", "missing.wav", None);
        let items = vec![
            completed(&dir, "one", "1.wav", Some(b"1")),
            missing.clone(),
            completed(&dir, "three", "3.wav", Some(b"3")),
        ];

        let mut buffer = Cursor::new(Vec::new());
        let summary = ArchiveExporter::new()
            .write_archive(&items, &mut buffer)
            .unwrap();

        assert_eq!(summary.skipped, vec![missing.id]);
        assert_eq!(
            read_names(buffer.into_inner()),
            vec!["001_one.wav", "002_three.wav"]
        );
    }

    #[test]
    fn test_non_completed_items_ignored() {
        let dir = TempDir::new().unwrap();
        let mut failed = QueueItem::new("failed");
        failed.mark_processing();
        failed.mark_failed("boom");
        let items = vec![
            QueueItem::new("pending"),
            failed,
            completed(&dir, "done", "done.wav", Some(b"x")),
        ];

        let mut buffer = Cursor::new(Vec::new());
        let summary = ArchiveExporter::new()
            .stored()
            .write_archive(&items, &mut buffer)
            .unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(read_names(buffer.into_inner()), vec!["001_done.wav"]);
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let mut buffer = Cursor::new(Vec::new());
        let summary = ArchiveExporter::new()
            .write_archive(&[], &mut buffer)
            .unwrap();
        assert!(summary.is_empty());
        assert!(read_names(buffer.into_inner()).is_empty());
    }

    #[test]
    fn test_export_to_path() {
        let dir = TempDir::new().unwrap();
        let items = vec![completed(&dir, "A fairly long sentence that keeps going", "x.wav", Some(b"x"))];
        let path = dir.path().join("out.zip");

        let summary = ArchiveExporter::new()
            .with_prefix_chars(10)
            .export_to_path(&items, &path)
            .unwrap();

        assert_eq!(summary.entries[0].name, "001_A fairly l.wav");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(read_names(bytes), vec!["001_A fairly l.wav"]);
    }

    #[test]
    fn test_export_to_bad_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("out.zip");
        let err = ArchiveExporter::new().export_to_path(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::CreateArchive { .. }));
    }
}
