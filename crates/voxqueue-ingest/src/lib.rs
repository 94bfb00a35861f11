//! Ingestion of generation requests for the voxqueue batch engine.
//!
//! - [`ItemRecord`] - A loosely-typed request record
//! - [`IngestDefaults`] - Values applied to fields the input leaves out
//! - [`from_text`] - One item per non-empty line
//! - [`from_csv`] - One item per CSV row
//! - [`from_json`] - One item per JSON record
//! - [`Ingested`] - Produced items plus the records that were skipped

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod defaults;
mod error;
mod format;
mod record;
mod report;
mod tabular;
mod text;

pub use defaults::IngestDefaults;
pub use error::{IngestError, RecordError, Result};
pub use format::{InputFormat, ingest, ingest_file};
pub use record::{ItemRecord, from_json};
pub use report::{Ingested, SkippedRecord};
pub use tabular::{NUMERIC_COLUMNS, from_csv};
pub use text::from_text;
