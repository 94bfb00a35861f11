//! Queue item lifecycle states.

use serde::{Deserialize, Serialize};

/// Status of a queue item.
///
/// Items move `Pending -> Processing -> Completed | Failed`. A pending item
/// may also be moved to `Cancelled`; a processing item never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Waiting to be generated.
    #[default]
    Pending,
    /// Currently being generated.
    Processing,
    /// Generated successfully.
    Completed,
    /// Generation failed.
    Failed,
    /// Cancelled before generation started.
    Cancelled,
}

impl ItemStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Returns true if the item is in a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the item has been through generation.
    #[must_use]
    pub const fn is_processed(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
