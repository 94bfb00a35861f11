//! Defaults applied to ingested requests.

use serde::{Deserialize, Serialize};
use voxqueue_types::{DEFAULT_ENGINE, Settings};

/// Values used for request fields the input does not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestDefaults {
    /// Generation engine.
    pub engine: String,
    /// Predefined voice name.
    pub voice_name: String,
    /// Generation settings.
    pub settings: Settings,
}

impl Default for IngestDefaults {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            voice_name: String::new(),
            settings: Settings::new(),
        }
    }
}

impl IngestDefaults {
    /// Sets the default voice name.
    #[must_use]
    pub fn with_voice(mut self, voice_name: impl Into<String>) -> Self {
        self.voice_name = voice_name.into();
        self
    }

    /// Sets the default engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the default settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = IngestDefaults::default();
        assert_eq!(defaults.engine, "turbo");
        assert!(defaults.voice_name.is_empty());
        assert!(defaults.settings.is_empty());
    }

    #[test]
    fn test_partial_deserialize() {
        let defaults: IngestDefaults = serde_json::from_str(r#"{"voice_name":"alice"}"#).unwrap();
        assert_eq!(defaults.voice_name, "alice");
        assert_eq!(defaults.engine, "turbo");
    }
}
