//! Progress and ETA estimation.

use serde::Serialize;
use voxqueue_types::{ItemStatus, QueueItem};

/// Batch progress, derived from the items in the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Number of completed items.
    pub current: usize,
    /// Total number of items.
    pub total: usize,
    /// Completed fraction in `[0, 1]`; zero for an empty queue.
    pub fraction: f64,
    /// Completed percentage in `[0, 100]`.
    pub percentage: f64,
    /// Estimated seconds until every item is done.
    ///
    /// `None` until at least one item has completed.
    pub eta_seconds: Option<f64>,
}

impl Progress {
    /// Computes progress for `items`.
    ///
    /// The ETA is `remaining items x mean completed duration x calibration`,
    /// where remaining is everything not yet completed.
    #[must_use]
    pub fn from_items(items: &[QueueItem], calibration: f64) -> Self {
        let total = items.len();
        let durations: Vec<f64> = items
            .iter()
            .filter(|item| item.status == ItemStatus::Completed)
            .map(|item| item.duration_seconds().unwrap_or(0.0))
            .collect();
        let current = durations.len();

        let fraction = if total == 0 {
            0.0
        } else {
            current as f64 / total as f64
        };

        let eta_seconds = if durations.is_empty() {
            None
        } else {
            let mean = durations.iter().sum::<f64>() / current as f64;
            let remaining = (total - current) as f64;
            Some((mean * remaining * calibration).max(0.0))
        };

        Self {
            current,
            total,
            fraction,
            percentage: fraction * 100.0,
            eta_seconds,
        }
    }

    /// Returns true once every item has completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.current == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxqueue_types::GeneratedAudio;

    fn completed(duration: f64) -> QueueItem {
        let mut item = QueueItem::new("done");
        item.mark_processing();
        item.mark_completed(GeneratedAudio::new("/tmp/done.wav", duration));
        item
    }

    #[test]
    fn test_empty_queue() {
        let progress = Progress::from_items(&[], 2.0);
        assert_eq!(progress.total, 0);
        assert!((progress.fraction - 0.0).abs() < f64::EPSILON);
        assert!(progress.eta_seconds.is_none());
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_eta_unavailable_without_completed_items() {
        let items = vec![QueueItem::new("a"), QueueItem::new("b")];
        let progress = Progress::from_items(&items, 2.0);
        assert_eq!(progress.current, 0);
        assert!(progress.eta_seconds.is_none());
    }

    #[test]
    fn test_eta_from_mean_duration() {
        let items = vec![
            completed(2.0),
            completed(4.0),
            QueueItem::new("c"),
            QueueItem::new("d"),
        ];
        let progress = Progress::from_items(&items, 2.0);

        assert_eq!(progress.current, 2);
        assert!((progress.fraction - 0.5).abs() < 1e-9);
        assert!((progress.percentage - 50.0).abs() < 1e-9);
        // mean 3s x 2 remaining x 2.0
        assert!((progress.eta_seconds.unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_eta_zero_when_all_completed() {
        let items = vec![completed(1.0), completed(3.0)];
        let progress = Progress::from_items(&items, 2.0);
        assert!(progress.is_complete());
        assert!((progress.eta_seconds.unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_items_count_as_remaining() {
        let mut failed = QueueItem::new("f");
        failed.mark_processing();
        failed.mark_failed("boom");
        let items = vec![completed(5.0), failed];

        let progress = Progress::from_items(&items, 1.0);
        assert_eq!(progress.current, 1);
        assert!((progress.eta_seconds.unwrap() - 5.0).abs() < 1e-9);
    }
}
