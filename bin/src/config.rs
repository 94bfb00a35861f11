//! CLI configuration file.
//!
//! ```toml
//! [queue]
//! eta_calibration_factor = 2.0
//! generation_timeout_secs = 300.0
//!
//! [ingest]
//! engine = "turbo"
//! voice_name = "Emily"
//!
//! [generator]
//! program = "/usr/local/bin/tts-render"
//! args = ["--quality", "high"]
//! output_dir = "outputs"
//! extension = ".wav"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use voxqueue_lib::{IngestDefaults, QueueConfig};

/// Errors loading the configuration file.
#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How the command-backed generator is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GeneratorConfig {
    pub(crate) program: Option<PathBuf>,
    pub(crate) args: Vec<String>,
    pub(crate) output_dir: PathBuf,
    pub(crate) extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            output_dir: PathBuf::from("outputs"),
            extension: ".wav".to_string(),
        }
    }
}

/// Everything read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) queue: QueueConfig,
    pub(crate) ingest: IngestDefaults,
    pub(crate) generator: GeneratorConfig,
}

impl CliConfig {
    /// Returns the default config file location.
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "voxqueue").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the config from `explicit`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub(crate) fn apply_ingest_overrides(&mut self, voice: Option<String>, engine: Option<String>) {
        if let Some(voice) = voice {
            self.ingest.voice_name = voice;
        }
        if let Some(engine) = engine {
            self.ingest.engine = engine;
        }
    }

    pub(crate) fn apply_generator_overrides(
        &mut self,
        program: Option<PathBuf>,
        args: Vec<String>,
        output_dir: Option<PathBuf>,
        extension: Option<String>,
    ) {
        if program.is_some() {
            self.generator.program = program;
        }
        if !args.is_empty() {
            self.generator.args = args;
        }
        if let Some(dir) = output_dir {
            self.generator.output_dir = dir;
        }
        if let Some(ext) = extension {
            self.generator.extension = ext;
        }
    }
}
