//! CSV ingestion.

use crate::{IngestDefaults, Ingested, ItemRecord, RecordError, Result};
use csv::{ReaderBuilder, StringRecord};
use voxqueue_types::Settings;

/// Numeric setting columns recognized in tabular input.
pub const NUMERIC_COLUMNS: [&str; 4] = ["exaggeration", "cfg_weight", "temperature", "speed_factor"];

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    text: Option<usize>,
    voice: Option<usize>,
    numeric: Vec<(&'static str, usize)>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        Self {
            text: position("text"),
            voice: position("voice_name").or_else(|| position("voice")),
            numeric: NUMERIC_COLUMNS
                .iter()
                .filter_map(|&name| position(name).map(|idx| (name, idx)))
                .collect(),
        }
    }

    fn record(&self, row: &StringRecord) -> std::result::Result<ItemRecord, RecordError> {
        let raw_cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .filter(|v| !v.trim().is_empty())
        };
        let cell = |idx: Option<usize>| raw_cell(idx).map(str::trim);

        let mut settings = Settings::new();
        for &(name, idx) in &self.numeric {
            let Some(raw) = cell(Some(idx)) else {
                continue;
            };
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RecordError::InvalidNumber {
                    column: name.to_string(),
                    value: raw.to_string(),
                })?;
            settings.insert(name.to_string(), value.into());
        }

        Ok(ItemRecord {
            text: raw_cell(self.text).map(str::to_string),
            voice_name: cell(self.voice).map(str::to_string),
            settings: Some(settings),
            ..ItemRecord::default()
        })
    }
}

/// Builds one queue item per CSV data row.
///
/// The first row is the header. Recognized columns are `text`, `voice_name`
/// (or `voice`) and the [`NUMERIC_COLUMNS`]; anything else is ignored. Rows
/// without text, and rows with an unparsable number, are skipped.
///
/// # Errors
///
/// Returns an error if the header row cannot be read.
pub fn from_csv(content: &str, defaults: &IngestDefaults) -> Result<Ingested> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = Columns::from_headers(reader.headers()?);

    let mut ingested = Ingested::default();
    for (idx, row) in reader.records().enumerate() {
        let outcome = row
            .map_err(|e| RecordError::Malformed(e.to_string()))
            .and_then(|row| columns.record(&row))
            .and_then(|record| record.into_item(defaults));
        ingested.push(idx + 1, outcome);
    }

    Ok(ingested)
}
