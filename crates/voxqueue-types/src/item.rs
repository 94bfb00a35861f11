//! Queue item definitions.

use crate::{ItemStatus, VoiceSelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for a queue item.
pub type ItemId = Uuid;

/// Generation parameters passed through to the backend unmodified.
///
/// Values are arbitrary JSON, so unknown keys and non-numeric values
/// survive ingestion and reach the generator as given.
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Engine used when a request does not name one.
pub const DEFAULT_ENGINE: &str = "turbo";

/// Audio produced by a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAudio {
    /// Location of the produced audio file.
    pub path: PathBuf,
    /// Duration of the produced audio in seconds.
    pub duration_seconds: f64,
}

impl GeneratedAudio {
    /// Creates a new generation output.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, duration_seconds: f64) -> Self {
        Self {
            path: path.into(),
            duration_seconds,
        }
    }

    /// Returns the file extension of the output, including the leading dot.
    ///
    /// Returns an empty string when the path has no extension.
    #[must_use]
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Returns the output location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A single generation request in the batch queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// Text to generate audio for.
    pub text: String,
    /// Voice to generate with.
    pub voice: VoiceSelection,
    /// Generation backend or model variant.
    pub engine: String,
    /// Backend parameters.
    pub settings: Settings,
    /// Current status of this item.
    pub status: ItemStatus,
    /// Generated audio, set once the item completes.
    pub output: Option<GeneratedAudio>,
    /// Failure description, set once the item fails.
    pub error: Option<String>,
    /// Timestamp when the item was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when generation finished (successfully or not).
    pub completed_at: Option<DateTime<Utc>>,
}

impl QueueItem {
    /// Creates a new pending item with the default voice, engine and settings.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            voice: VoiceSelection::default(),
            engine: DEFAULT_ENGINE.to_string(),
            settings: Settings::new(),
            status: ItemStatus::Pending,
            output: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Sets the voice selection.
    #[must_use]
    pub fn with_voice(mut self, voice: VoiceSelection) -> Self {
        self.voice = voice;
        self
    }

    /// Sets the generation engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns true if the item is in a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns the output duration, if the item completed.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<f64> {
        self.output.as_ref().map(|o| o.duration_seconds)
    }

    /// Marks the item as being generated.
    pub fn mark_processing(&mut self) {
        self.status = ItemStatus::Processing;
        self.output = None;
        self.error = None;
    }

    /// Marks the item as completed with the generated audio.
    pub fn mark_completed(&mut self, output: GeneratedAudio) {
        self.status = ItemStatus::Completed;
        self.output = Some(output);
        self.error = None;
        self.completed_at = Some(Utc::now());
    }

    /// Marks the item as failed with an error message.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = ItemStatus::Failed;
        self.output = None;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Cancels the item if it has not started.
    ///
    /// Returns true if the item was pending and is now cancelled.
    pub fn mark_cancelled(&mut self) -> bool {
        if self.status != ItemStatus::Pending {
            return false;
        }
        self.status = ItemStatus::Cancelled;
        true
    }
}
