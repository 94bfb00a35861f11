//! Batch text-to-speech queue processing.
//!
//! This is a facade crate that re-exports functionality from the voxqueue
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use voxqueue_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ingested = from_text("First line\nSecond line", &IngestDefaults::default());
//!
//!     let store = QueueStore::new();
//!     store.add_all(ingested.into_items()).await;
//!
//!     let generator = FnGenerator::new(|item: QueueItem| async move {
//!         Ok::<_, anyhow::Error>(GeneratedAudio::new(format!("/tmp/{}.wav", item.id), 1.0))
//!     });
//!     let scheduler = Scheduler::new(store, Arc::new(generator), QueueConfig::default());
//!
//!     if let Some(summary) = scheduler.run().await {
//!         println!("{} completed", summary.completed);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use voxqueue_types::*;

// Re-export the scheduler
pub use voxqueue_scheduler::{
    FnGenerator, Generator, Progress, QueueConfig, QueueStatus, QueueStore, RunSummary, Scheduler,
    StatusCounts,
};

// Re-export ingestion
#[cfg(feature = "ingest")]
pub use voxqueue_ingest::{
    IngestDefaults, IngestError, Ingested, InputFormat, ItemRecord, NUMERIC_COLUMNS, RecordError,
    SkippedRecord, from_csv, from_json, from_text, ingest, ingest_file,
};

// Re-export archive export
#[cfg(feature = "export")]
pub use voxqueue_export::{
    ArchiveEntry, ArchiveExporter, DEFAULT_PREFIX_CHARS, ExportError, ExportSummary, entry_name,
    sanitize_prefix,
};

/// Prelude module for convenient imports.
///
/// ```
/// use voxqueue_lib::prelude::*;
/// ```
pub mod prelude {
    pub use voxqueue_types::{
        CloneSource, GeneratedAudio, ItemId, ItemStatus, QueueError, QueueItem, Settings,
        VoiceMode, VoiceSelection,
    };

    pub use voxqueue_scheduler::{
        FnGenerator, Generator, Progress, QueueConfig, QueueStatus, QueueStore, RunSummary,
        Scheduler,
    };

    #[cfg(feature = "ingest")]
    pub use voxqueue_ingest::{
        IngestDefaults, Ingested, InputFormat, from_csv, from_json, from_text, ingest_file,
    };

    #[cfg(feature = "export")]
    pub use voxqueue_export::{ArchiveExporter, ExportSummary};
}
