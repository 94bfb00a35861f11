//! Line-oriented ingestion.

use crate::{IngestDefaults, Ingested, ItemRecord};

/// Builds one queue item per non-empty line of `content`.
///
/// Lines are trimmed; blank lines are dropped. Every item uses the voice,
/// engine and settings from `defaults`.
#[must_use]
pub fn from_text(content: &str, defaults: &IngestDefaults) -> Ingested {
    let mut ingested = Ingested::default();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        ingested.push(idx + 1, ItemRecord::with_text(line).into_item(defaults));
    }

    ingested
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxqueue_types::{Settings, VoiceSelection};

    #[test]
    fn test_blank_lines_are_dropped() {
        let ingested = from_text("a\n\nb\n  \nc", &IngestDefaults::default());

        let texts: Vec<_> = ingested.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert!(ingested.skipped.is_empty());
    }

    #[test]
    fn test_lines_are_trimmed() {
        let ingested = from_text("  first line  \r\n\tsecond\r\n", &IngestDefaults::default());

        let texts: Vec<_> = ingested.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["first line", "second"]);
    }

    #[test]
    fn test_lines_inherit_defaults() {
        let mut settings = Settings::new();
        settings.insert("speed_factor".to_string(), 1.25_f64.into());
        let defaults = IngestDefaults::default()
            .with_voice("narrator")
            .with_settings(settings);

        let ingested = from_text("one\ntwo", &defaults);
        for item in &ingested.items {
            assert_eq!(item.voice, VoiceSelection::predefined("narrator"));
            assert_eq!(item.settings["speed_factor"], 1.25);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(from_text("", &IngestDefaults::default()).is_empty());
        assert!(from_text("\n \n\t\n", &IngestDefaults::default()).is_empty());
    }
}
