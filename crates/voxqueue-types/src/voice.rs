//! Voice selection for generation requests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the voice of a request is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceMode {
    /// A named voice shipped with the generation backend.
    #[default]
    Predefined,
    /// A cloned voice, from a stored profile or reference audio.
    Clone,
}

impl VoiceMode {
    /// Returns the mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Predefined => "predefined",
            Self::Clone => "clone",
        }
    }
}

impl std::fmt::Display for VoiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a cloned voice comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneSource {
    /// A stored voice profile, by id.
    Profile(String),
    /// A reference audio file.
    ReferenceAudio(PathBuf),
}

/// Voice used for a generation request.
///
/// Each mode carries exactly the reference that is meaningful for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum VoiceSelection {
    /// A named predefined voice. An empty name lets the backend choose.
    Predefined {
        /// Voice name.
        name: String,
    },
    /// A cloned voice.
    Clone {
        /// Source of the cloned voice.
        source: CloneSource,
    },
}

impl VoiceSelection {
    /// Creates a predefined voice selection.
    #[must_use]
    pub fn predefined(name: impl Into<String>) -> Self {
        Self::Predefined { name: name.into() }
    }

    /// Creates a clone selection backed by a stored voice profile.
    #[must_use]
    pub fn profile(profile_id: impl Into<String>) -> Self {
        Self::Clone {
            source: CloneSource::Profile(profile_id.into()),
        }
    }

    /// Creates a clone selection backed by a reference audio file.
    #[must_use]
    pub fn reference_audio(path: impl Into<PathBuf>) -> Self {
        Self::Clone {
            source: CloneSource::ReferenceAudio(path.into()),
        }
    }

    /// Returns the mode tag of this selection.
    #[must_use]
    pub const fn mode(&self) -> VoiceMode {
        match self {
            Self::Predefined { .. } => VoiceMode::Predefined,
            Self::Clone { .. } => VoiceMode::Clone,
        }
    }

    /// Returns a short human-readable label for the voice.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Predefined { name } => name.clone(),
            Self::Clone {
                source: CloneSource::Profile(id),
            } => format!("profile:{id}"),
            Self::Clone {
                source: CloneSource::ReferenceAudio(path),
            } => format!("audio:{}", path.display()),
        }
    }
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self::predefined("")
    }
}
