//! Archive export for voxqueue.
//!
//! - [`ArchiveExporter`] - Writes completed outputs into a ZIP archive
//! - [`ExportSummary`] - Entries written and items skipped
//! - [`sanitize_prefix`] - Filename-safe prefix of an item's text

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod error;
mod naming;

pub use archive::{ArchiveEntry, ArchiveExporter, ExportSummary};
pub use error::{ExportError, Result};
pub use naming::{DEFAULT_PREFIX_CHARS, entry_name, sanitize_prefix};
