//! The external generation operation.

use async_trait::async_trait;
use std::future::Future;
use voxqueue_types::{GeneratedAudio, QueueItem};

/// Produces audio for a queue item.
///
/// The scheduler calls [`Generator::generate`] once per item while the item
/// is processing. Any error is recorded on the item as a failure; it never
/// stops the run.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates audio for `item`.
    async fn generate(&self, item: &QueueItem) -> anyhow::Result<GeneratedAudio>;
}

/// A [`Generator`] backed by an async closure.
pub struct FnGenerator<F> {
    func: F,
}

impl<F> FnGenerator<F> {
    /// Wraps an async closure taking an owned item.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> std::fmt::Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGenerator").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Generator for FnGenerator<F>
where
    F: Fn(QueueItem) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<GeneratedAudio>> + Send,
{
    async fn generate(&self, item: &QueueItem) -> anyhow::Result<GeneratedAudio> {
        (self.func)(item.clone()).await
    }
}
