//! Single-record and JSON ingestion.

use crate::{IngestDefaults, IngestError, Ingested, RecordError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use voxqueue_types::{QueueItem, Settings, VoiceMode, VoiceSelection};

/// A generation request as supplied by a caller.
///
/// Every field is optional; missing fields fall back to [`IngestDefaults`].
/// Only `text` is required for the record to produce an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Text to generate.
    pub text: Option<String>,
    /// Voice mode, `predefined` unless given.
    pub voice_mode: Option<VoiceMode>,
    /// Predefined voice name.
    pub voice_name: Option<String>,
    /// Voice profile id for clone mode.
    pub voice_profile_id: Option<String>,
    /// Reference audio path for clone mode.
    pub reference_audio: Option<PathBuf>,
    /// Generation engine.
    pub engine: Option<String>,
    /// Generation settings.
    pub settings: Option<Settings>,
}

impl ItemRecord {
    /// Creates a record carrying only text.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Builds a pending queue item from this record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingText`] if the record has no text, and
    /// [`RecordError::MissingCloneSource`] for a clone-mode record without a
    /// profile id or reference audio.
    pub fn into_item(self, defaults: &IngestDefaults) -> std::result::Result<QueueItem, RecordError> {
        let text = self
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(RecordError::MissingText)?;

        let voice = match self.voice_mode.unwrap_or_default() {
            VoiceMode::Predefined => VoiceSelection::predefined(
                self.voice_name
                    .unwrap_or_else(|| defaults.voice_name.clone()),
            ),
            VoiceMode::Clone => match (self.voice_profile_id, self.reference_audio) {
                (Some(profile), _) if !profile.is_empty() => VoiceSelection::profile(profile),
                (_, Some(path)) if !path.as_os_str().is_empty() => {
                    VoiceSelection::reference_audio(path)
                }
                _ => return Err(RecordError::MissingCloneSource),
            },
        };

        Ok(QueueItem::new(text)
            .with_voice(voice)
            .with_engine(self.engine.unwrap_or_else(|| defaults.engine.clone()))
            .with_settings(self.settings.unwrap_or_else(|| defaults.settings.clone())))
    }
}

/// Builds queue items from a JSON document.
///
/// The document may be a single record object or an array of records.
/// Array elements that are not valid records are skipped.
///
/// # Errors
///
/// Returns an error if the input is not JSON, or is JSON of another shape.
pub fn from_json(content: &str, defaults: &IngestDefaults) -> Result<Ingested> {
    let document: Value = serde_json::from_str(content)?;

    let records = match document {
        Value::Array(values) => values,
        value @ Value::Object(_) => vec![value],
        Value::Null => return Err(IngestError::UnexpectedJson("null")),
        Value::Bool(_) => return Err(IngestError::UnexpectedJson("a boolean")),
        Value::Number(_) => return Err(IngestError::UnexpectedJson("a number")),
        Value::String(_) => return Err(IngestError::UnexpectedJson("a string")),
    };

    let mut ingested = Ingested::default();
    for (idx, value) in records.into_iter().enumerate() {
        let outcome = serde_json::from_value::<ItemRecord>(value)
            .map_err(|e| RecordError::Malformed(e.to_string()))
            .and_then(|record| record.into_item(defaults));
        ingested.push(idx + 1, outcome);
    }

    Ok(ingested)
}
