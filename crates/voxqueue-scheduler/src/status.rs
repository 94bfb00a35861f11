//! Status snapshots for queue observers.

use serde::Serialize;
use voxqueue_types::{ItemStatus, QueueItem};

/// Number of items in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Items waiting to be generated.
    pub pending: usize,
    /// Items being generated.
    pub processing: usize,
    /// Items generated successfully.
    pub completed: usize,
    /// Items whose generation failed.
    pub failed: usize,
    /// Items cancelled before generation.
    pub cancelled: usize,
}

impl StatusCounts {
    /// Counts the statuses of `items`.
    #[must_use]
    pub fn from_items(items: &[QueueItem]) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.add(item.status);
        }
        counts
    }

    /// Records one more item with the given status.
    pub const fn add(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Pending => self.pending += 1,
            ItemStatus::Processing => self.processing += 1,
            ItemStatus::Completed => self.completed += 1,
            ItemStatus::Failed => self.failed += 1,
            ItemStatus::Cancelled => self.cancelled += 1,
        }
    }

    /// Returns the count for a single status.
    #[must_use]
    pub const fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Pending => self.pending,
            ItemStatus::Processing => self.processing,
            ItemStatus::Completed => self.completed,
            ItemStatus::Failed => self.failed,
            ItemStatus::Cancelled => self.cancelled,
        }
    }

    /// Returns the total number of items counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.processing + self.completed + self.failed + self.cancelled
    }
}

/// Point-in-time view of the queue and its run state.
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    /// Whether a run is active.
    pub is_running: bool,
    /// Whether the run is paused.
    pub is_paused: bool,
    /// Whether cancellation has been requested.
    pub cancel_requested: bool,
    /// Store position of the most recently started item.
    pub current_index: Option<usize>,
    /// Total number of items.
    pub total: usize,
    /// Per-status counts.
    #[serde(flatten)]
    pub counts: StatusCounts,
    /// Every item, in store order.
    pub items: Vec<QueueItem>,
}
