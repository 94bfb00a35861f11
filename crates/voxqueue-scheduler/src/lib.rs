//! Batch queue and sequential execution engine for voxqueue.
//!
//! - [`QueueStore`] - Shared, ordered collection of queue items
//! - [`Scheduler`] - Single-flight loop driving items through generation
//! - [`Generator`] - The external generation operation
//! - [`QueueStatus`] / [`Progress`] - Read-only snapshots for observers
//! - [`QueueConfig`] - Scheduler tuning

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod generator;
mod progress;
mod scheduler;
mod status;
mod store;

pub use config::QueueConfig;
pub use generator::{FnGenerator, Generator};
pub use progress::Progress;
pub use scheduler::{RunSummary, Scheduler};
pub use status::{QueueStatus, StatusCounts};
pub use store::QueueStore;
