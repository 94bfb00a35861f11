//! Error types for queue mutations.

use crate::{ItemId, ItemStatus};
use thiserror::Error;

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Structural errors reported to callers of queue mutations.
///
/// Generation failures are never reported through this type; they are
/// recorded on the item itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No item with the given id exists in the queue.
    #[error("Queue item not found: {0}")]
    NotFound(ItemId),

    /// The item is being generated and cannot be modified.
    #[error("Queue item {id} is busy ({status})")]
    Busy {
        /// The item that was targeted.
        id: ItemId,
        /// The status that blocked the operation.
        status: ItemStatus,
    },
}
