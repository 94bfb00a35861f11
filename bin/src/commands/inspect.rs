//! Inspect command implementation.
//!
//! Ingests an input file without generating anything, so a batch can be
//! checked before a run.

use crate::config::CliConfig;
use crate::display::{Format, print_ingested};
use anyhow::{Context, Result};
use std::path::Path;
use voxqueue_lib::{InputFormat, ingest_file};

/// Execute the inspect command.
pub(crate) fn inspect(
    input: &Path,
    input_format: Option<InputFormat>,
    format: Format,
    config: &CliConfig,
) -> Result<()> {
    let ingested = ingest_file(input, input_format, &config.ingest)
        .with_context(|| format!("Failed to ingest {}", input.display()))?;
    print_ingested(&ingested, format)
}
