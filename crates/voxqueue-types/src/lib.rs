//! Core types for the voxqueue batch generation engine.
//!
//! This crate provides the data structures shared by every voxqueue crate:
//!
//! - [`QueueItem`] - A single generation request and its result
//! - [`ItemStatus`] - Lifecycle state of a queue item
//! - [`VoiceSelection`] - Which voice a request is rendered with
//! - [`GeneratedAudio`] - Output produced by a successful generation
//! - [`QueueError`] - Structural errors reported by queue mutations

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod item;
mod status;
mod voice;

pub use error::{QueueError, Result};
pub use item::{DEFAULT_ENGINE, GeneratedAudio, ItemId, QueueItem, Settings};
pub use status::ItemStatus;
pub use voice::{CloneSource, VoiceMode, VoiceSelection};
