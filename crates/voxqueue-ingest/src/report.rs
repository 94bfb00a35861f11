//! Ingestion results.

use crate::RecordError;
use voxqueue_types::QueueItem;

/// A record that was left out of an ingested batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// 1-based record number (line, row, or array position).
    pub record: usize,
    /// Why the record was skipped.
    pub reason: RecordError,
}

/// Items produced from an input, with the records that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    /// Pending items, in input order.
    pub items: Vec<QueueItem>,
    /// Records that did not produce an item.
    pub skipped: Vec<SkippedRecord>,
}

impl Ingested {
    /// Returns the number of produced items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of records seen, produced or skipped.
    #[must_use]
    pub fn records_seen(&self) -> usize {
        self.items.len() + self.skipped.len()
    }

    /// Records the outcome of converting one record.
    pub(crate) fn push(&mut self, record: usize, outcome: Result<QueueItem, RecordError>) {
        match outcome {
            Ok(item) => self.items.push(item),
            Err(reason) => {
                tracing::warn!(record, %reason, "Skipping ingestion record");
                self.skipped.push(SkippedRecord { record, reason });
            }
        }
    }

    /// Consumes the report, returning the produced items.
    #[must_use]
    pub fn into_items(self) -> Vec<QueueItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_tracks_items_and_skips() {
        let mut ingested = Ingested::default();
        ingested.push(1, Ok(QueueItem::new("a")));
        ingested.push(2, Err(RecordError::MissingText));
        ingested.push(3, Ok(QueueItem::new("b")));

        assert_eq!(ingested.len(), 2);
        assert_eq!(ingested.records_seen(), 3);
        assert_eq!(
            ingested.skipped,
            vec![SkippedRecord {
                record: 2,
                reason: RecordError::MissingText
            }]
        );
    }
}
