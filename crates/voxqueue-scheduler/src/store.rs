//! Shared, ordered queue storage.

use crate::StatusCounts;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use voxqueue_types::{GeneratedAudio, ItemId, ItemStatus, QueueError, QueueItem, Result};

/// Ordered collection of queue items.
///
/// Order is both display order and the order in which pending items are
/// generated. Cloning the store yields another handle to the same items, so
/// the scheduler and its callers can share one store.
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    items: Arc<RwLock<Vec<QueueItem>>>,
}

impl QueueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item to the end of the queue.
    pub async fn add(&self, item: QueueItem) -> ItemId {
        let id = item.id;
        self.items.write().await.push(item);
        debug!(%id, "Added queue item");
        id
    }

    /// Appends several items, preserving their order.
    pub async fn add_all(&self, items: impl IntoIterator<Item = QueueItem>) -> Vec<ItemId> {
        let mut guard = self.items.write().await;
        let start = guard.len();
        guard.extend(items);
        let ids: Vec<_> = guard[start..].iter().map(|item| item.id).collect();
        debug!(count = ids.len(), "Added queue items");
        ids
    }

    /// Removes an item.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] if no item has this id, and
    /// [`QueueError::Busy`] if the item is being generated.
    pub async fn remove(&self, id: ItemId) -> Result<QueueItem> {
        let mut items = self.items.write().await;
        let idx = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(QueueError::NotFound(id))?;

        if items[idx].status == ItemStatus::Processing {
            return Err(QueueError::Busy {
                id,
                status: ItemStatus::Processing,
            });
        }

        debug!(%id, "Removed queue item");
        Ok(items.remove(idx))
    }

    /// Re-sequences the pending items.
    ///
    /// The queue becomes every non-pending item in its current relative
    /// order, followed by the pending items listed in `ordered_ids`, followed
    /// by any pending items the list left out, in their current relative
    /// order. Ids that are unknown or not pending are ignored.
    pub async fn reorder(&self, ordered_ids: &[ItemId]) {
        let mut items = self.items.write().await;

        let (mut pending, others): (Vec<_>, Vec<_>) = std::mem::take(&mut *items)
            .into_iter()
            .partition(|item| item.status == ItemStatus::Pending);

        let positions: HashMap<ItemId, usize> = ordered_ids
            .iter()
            .enumerate()
            .rev()
            .map(|(pos, id)| (*id, pos))
            .collect();

        // Stable sort keeps unlisted items in their prior order, after the listed ones.
        pending.sort_by_key(|item| positions.get(&item.id).copied().unwrap_or(usize::MAX));

        debug!(pending = pending.len(), "Reordered queue");
        *items = others;
        items.extend(pending);
    }

    /// Removes every item, returning how many were discarded.
    pub async fn clear(&self) -> usize {
        let mut items = self.items.write().await;
        let count = items.len();
        items.clear();
        debug!(count, "Cleared queue");
        count
    }

    /// Removes completed and failed items, returning how many were removed.
    pub async fn clear_completed(&self) -> usize {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| !item.status.is_processed());
        let removed = before - items.len();
        debug!(removed, "Cleared processed queue items");
        removed
    }

    /// Returns a copy of the item with the given id.
    pub async fn get(&self, id: ItemId) -> Option<QueueItem> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Returns the number of items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Returns a copy of every item, in order.
    pub async fn snapshot(&self) -> Vec<QueueItem> {
        self.items.read().await.clone()
    }

    /// Returns per-status counts.
    pub async fn counts(&self) -> StatusCounts {
        StatusCounts::from_items(&self.items.read().await)
    }

    /// Returns completed items that carry an output, in store order.
    pub async fn completed_outputs(&self) -> Vec<QueueItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| item.status == ItemStatus::Completed && item.output.is_some())
            .cloned()
            .collect()
    }

    /// Starts the first pending item in store order.
    ///
    /// `may_start` is consulted while the store is locked; if it returns
    /// false nothing is started. Returns the item's position and a copy of
    /// the item as it entered processing.
    pub(crate) async fn start_next(
        &self,
        may_start: impl FnOnce() -> bool,
    ) -> NextItem {
        let mut items = self.items.write().await;

        let Some(idx) = items
            .iter()
            .position(|item| item.status == ItemStatus::Pending)
        else {
            return NextItem::Exhausted;
        };

        if !may_start() {
            return NextItem::Held;
        }

        let item = &mut items[idx];
        item.mark_processing();
        NextItem::Started(idx, item.clone())
    }

    /// Records the outcome of a generation on the item.
    ///
    /// Returns false if the item is no longer in the store.
    pub(crate) async fn finish(
        &self,
        id: ItemId,
        outcome: std::result::Result<GeneratedAudio, String>,
    ) -> bool {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return false;
        };

        match outcome {
            Ok(output) => item.mark_completed(output),
            Err(message) => item.mark_failed(message),
        }
        true
    }

    /// Cancels every pending item, returning how many were cancelled.
    pub(crate) async fn cancel_pending(&self) -> usize {
        let mut items = self.items.write().await;
        items
            .iter_mut()
            .map(QueueItem::mark_cancelled)
            .filter(|cancelled| *cancelled)
            .count()
    }
}

/// Result of trying to start the next pending item.
#[derive(Debug)]
pub(crate) enum NextItem {
    /// An item moved to processing at the given position.
    Started(usize, QueueItem),
    /// A pending item exists but starting was not allowed.
    Held,
    /// No pending item remains.
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(text: &str, status: ItemStatus) -> QueueItem {
        let mut item = QueueItem::new(text);
        match status {
            ItemStatus::Pending => {}
            ItemStatus::Processing => item.mark_processing(),
            ItemStatus::Completed => {
                item.mark_processing();
                item.mark_completed(GeneratedAudio::new(format!("/tmp/{text}.wav"), 1.0));
            }
            ItemStatus::Failed => {
                item.mark_processing();
                item.mark_failed("boom");
            }
            ItemStatus::Cancelled => {
                item.mark_cancelled();
            }
        }
        item
    }

    async fn texts(store: &QueueStore) -> Vec<String> {
        store.snapshot().await.into_iter().map(|i| i.text).collect()
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let store = QueueStore::new();
        store.add(QueueItem::new("a")).await;
        store
            .add_all(vec![QueueItem::new("b"), QueueItem::new("c")])
            .await;

        assert_eq!(texts(&store).await, vec!["a", "b", "c"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_remove_preserves_order() {
        let store = QueueStore::new();
        let ids = store
            .add_all(vec![QueueItem::new("a"), QueueItem::new("b"), QueueItem::new("c")])
            .await;

        let removed = store.remove(ids[1]).await.unwrap();
        assert_eq!(removed.text, "b");
        assert_eq!(texts(&store).await, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_id() {
        let store = QueueStore::new();
        store.add(QueueItem::new("a")).await;

        let missing = QueueItem::new("ghost").id;
        assert_eq!(store.remove(missing).await, Err(QueueError::NotFound(missing)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_processing_is_refused() {
        let store = QueueStore::new();
        let id = store.add(with_status("busy", ItemStatus::Processing)).await;

        let err = store.remove(id).await.unwrap_err();
        assert!(matches!(err, QueueError::Busy { .. }));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(id).await.unwrap().status, ItemStatus::Processing);
    }

    #[tokio::test]
    async fn test_remove_finished_items() {
        let store = QueueStore::new();
        let done = store.add(with_status("done", ItemStatus::Completed)).await;
        let gone = store.add(with_status("gone", ItemStatus::Cancelled)).await;

        assert!(store.remove(done).await.is_ok());
        assert!(store.remove(gone).await.is_ok());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_count_tracks_adds_and_removes() {
        let store = QueueStore::new();
        let mut added = 0;
        let mut removed = 0;
        let mut ids = Vec::new();

        for i in 0..10 {
            ids.push(store.add(QueueItem::new(format!("item {i}"))).await);
            added += 1;
        }
        for id in ids.iter().step_by(3) {
            if store.remove(*id).await.is_ok() {
                removed += 1;
            }
        }
        // Second removal of the same ids must fail.
        for id in ids.iter().step_by(3) {
            assert!(store.remove(*id).await.is_err());
        }
        let mut reversed = ids.clone();
        reversed.reverse();
        store.reorder(&reversed).await;

        assert_eq!(store.len().await, added - removed);
    }

    #[tokio::test]
    async fn test_reorder_moves_non_pending_first() {
        let store = QueueStore::new();
        store.add(with_status("done", ItemStatus::Completed)).await;
        let a = store.add(with_status("a", ItemStatus::Pending)).await;
        let b = store.add(with_status("b", ItemStatus::Pending)).await;
        store.add(with_status("busy", ItemStatus::Processing)).await;

        store.reorder(&[b, a]).await;

        assert_eq!(texts(&store).await, vec!["done", "busy", "b", "a"]);
    }

    #[tokio::test]
    async fn test_reorder_appends_unlisted_pending() {
        let store = QueueStore::new();
        let ids = store
            .add_all(vec![
                QueueItem::new("a"),
                QueueItem::new("b"),
                QueueItem::new("c"),
                QueueItem::new("d"),
            ])
            .await;

        store.reorder(&[ids[2], ids[0]]).await;

        assert_eq!(texts(&store).await, vec!["c", "a", "b", "d"]);
    }

    #[tokio::test]
    async fn test_reorder_ignores_unknown_and_duplicate_ids() {
        let store = QueueStore::new();
        let done = store.add(with_status("done", ItemStatus::Completed)).await;
        let ids = store
            .add_all(vec![QueueItem::new("a"), QueueItem::new("b")])
            .await;
        let ghost = QueueItem::new("ghost").id;

        store.reorder(&[ghost, ids[1], done, ids[1], ids[0]]).await;

        assert_eq!(texts(&store).await, vec!["done", "b", "a"]);
    }

    #[tokio::test]
    async fn test_clear_completed() {
        let store = QueueStore::new();
        store.add(with_status("p", ItemStatus::Pending)).await;
        store.add(with_status("c", ItemStatus::Completed)).await;
        store.add(with_status("f", ItemStatus::Failed)).await;
        store.add(with_status("r", ItemStatus::Processing)).await;

        assert_eq!(store.clear_completed().await, 2);
        assert_eq!(texts(&store).await, vec!["p", "r"]);
    }

    #[tokio::test]
    async fn test_clear_completed_keeps_cancelled() {
        let store = QueueStore::new();
        store.add(with_status("x", ItemStatus::Cancelled)).await;
        store.add(with_status("c", ItemStatus::Completed)).await;

        assert_eq!(store.clear_completed().await, 1);
        assert_eq!(texts(&store).await, vec!["x"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = QueueStore::new();
        store.add(with_status("r", ItemStatus::Processing)).await;
        store.add(QueueItem::new("p")).await;

        assert_eq!(store.clear().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_completed_outputs_in_store_order() {
        let store = QueueStore::new();
        store.add(with_status("first", ItemStatus::Completed)).await;
        store.add(with_status("skip", ItemStatus::Failed)).await;
        store.add(with_status("second", ItemStatus::Completed)).await;
        store.add(QueueItem::new("pending")).await;

        let outputs: Vec<_> = store
            .completed_outputs()
            .await
            .into_iter()
            .map(|i| i.text)
            .collect();
        assert_eq!(outputs, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_start_next_and_finish() {
        let store = QueueStore::new();
        store.add(with_status("done", ItemStatus::Completed)).await;
        let id = store.add(QueueItem::new("next")).await;

        let NextItem::Started(idx, item) = store.start_next(|| true).await else {
            panic!("expected an item to start");
        };
        assert_eq!(idx, 1);
        assert_eq!(item.id, id);
        assert_eq!(store.get(id).await.unwrap().status, ItemStatus::Processing);

        assert!(matches!(store.start_next(|| true).await, NextItem::Exhausted));

        assert!(store.finish(id, Err("bad input".to_string())).await);
        let item = store.get(id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Failed);
        assert_eq!(item.error.as_deref(), Some("bad input"));
    }

    #[tokio::test]
    async fn test_start_next_held() {
        let store = QueueStore::new();
        let id = store.add(QueueItem::new("wait")).await;

        assert!(matches!(store.start_next(|| false).await, NextItem::Held));
        assert_eq!(store.get(id).await.unwrap().status, ItemStatus::Pending);
    }

    #[tokio::test]
    async fn test_cancel_pending_leaves_processing() {
        let store = QueueStore::new();
        let busy = store.add(with_status("busy", ItemStatus::Processing)).await;
        store.add(QueueItem::new("a")).await;
        store.add(QueueItem::new("b")).await;
        store.add(with_status("done", ItemStatus::Completed)).await;

        assert_eq!(store.cancel_pending().await, 2);
        let counts = store.counts().await;
        assert_eq!(counts.cancelled, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(store.get(busy).await.unwrap().status, ItemStatus::Processing);
    }

    #[tokio::test]
    async fn test_finish_removed_item() {
        let store = QueueStore::new();
        let id = store.add(QueueItem::new("x")).await;
        store.start_next(|| true).await;
        store.clear().await;

        assert!(!store.finish(id, Ok(GeneratedAudio::new("/tmp/x.wav", 1.0))).await);
    }
}
