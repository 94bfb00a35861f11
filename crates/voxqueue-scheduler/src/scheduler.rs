//! Single-flight batch execution loop.

use crate::store::NextItem;
use crate::{Generator, Progress, QueueConfig, QueueStatus, QueueStore, StatusCounts};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use voxqueue_types::{GeneratedAudio, QueueItem};

/// Run-level state shared between the loop and its controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunControl {
    running: bool,
    paused: bool,
    cancel_requested: bool,
    current_index: Option<usize>,
}

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Items that entered processing during the run.
    pub processed: usize,
    /// Items that completed during the run.
    pub completed: usize,
    /// Items that failed during the run.
    pub failed: usize,
    /// Whether the run stopped because of a cancel request.
    pub cancelled: bool,
    /// Wall time of the run.
    pub elapsed: Duration,
}

struct Inner {
    store: QueueStore,
    generator: Arc<dyn Generator>,
    config: QueueConfig,
    control: watch::Sender<RunControl>,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("control", &*self.control.borrow())
            .finish_non_exhaustive()
    }
}

/// Marks the run idle when dropped, including on panic.
struct RunGuard(Arc<Inner>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.control.send_modify(|c| c.running = false);
    }
}

/// Drives queued items through generation, one at a time.
///
/// The scheduler walks the live store: items added, removed or reordered
/// during a run are seen at the next item boundary. Pause and cancel are
/// also honored at item boundaries; an in-flight generation is never
/// interrupted by them.
///
/// Cloning a scheduler yields another handle to the same queue and run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Creates a scheduler over `store` using `generator` for each item.
    #[must_use]
    pub fn new(store: QueueStore, generator: Arc<dyn Generator>, config: QueueConfig) -> Self {
        let (control, _) = watch::channel(RunControl::default());
        Self {
            inner: Arc::new(Inner {
                store,
                generator,
                config,
                control,
            }),
        }
    }

    /// Returns the queue store this scheduler runs.
    #[must_use]
    pub fn store(&self) -> &QueueStore {
        &self.inner.store
    }

    /// Returns the scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Returns true while a run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.control.borrow().running
    }

    /// Returns true if the run is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.control.borrow().paused
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.inner.control.borrow().cancel_requested
    }

    /// Runs the queue until no pending item remains or the run is cancelled.
    ///
    /// Returns `None` without doing anything if a run is already active.
    pub async fn run(&self) -> Option<RunSummary> {
        let guard = self.begin()?;
        let summary = self.run_loop().await;
        drop(guard);
        Some(summary)
    }

    /// Starts a run on a background task.
    ///
    /// Returns `None` if a run is already active.
    #[must_use]
    pub fn spawn(&self) -> Option<JoinHandle<RunSummary>> {
        let guard = self.begin()?;
        let scheduler = self.clone();
        Some(tokio::spawn(async move {
            let summary = scheduler.run_loop().await;
            drop(guard);
            summary
        }))
    }

    /// Waits until no run is active.
    pub async fn wait_idle(&self) {
        let mut control = self.inner.control.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = control.wait_for(|c| !c.running).await;
    }

    /// Stops starting new items until [`Scheduler::resume`] is called.
    pub fn pause(&self) {
        self.inner.control.send_modify(|c| c.paused = true);
        info!("Queue paused");
    }

    /// Lets a paused run start its next item.
    pub fn resume(&self) {
        self.inner.control.send_modify(|c| c.paused = false);
        info!("Queue resumed");
    }

    /// Cancels the run.
    ///
    /// Every pending item is cancelled immediately. The item being generated,
    /// if any, finishes normally, after which the run stops. Returns the
    /// number of items cancelled.
    pub async fn cancel(&self) -> usize {
        self.inner.control.send_modify(|c| {
            c.cancel_requested = true;
            c.paused = false;
        });
        let cancelled = self.inner.store.cancel_pending().await;
        info!(cancelled, "Queue cancelled");
        cancelled
    }

    /// Removes every item and resets the pause, cancel and current-item state.
    ///
    /// An active run is not stopped; it ends once it finds no pending item.
    pub async fn clear(&self) -> usize {
        let count = self.inner.store.clear().await;
        self.inner.control.send_modify(|c| {
            c.paused = false;
            c.cancel_requested = false;
            c.current_index = None;
        });
        count
    }

    /// Returns a snapshot of the run state and every item.
    pub async fn status(&self) -> QueueStatus {
        let items = self.inner.store.snapshot().await;
        let control = *self.inner.control.borrow();
        QueueStatus {
            is_running: control.running,
            is_paused: control.paused,
            cancel_requested: control.cancel_requested,
            current_index: control.current_index,
            total: items.len(),
            counts: StatusCounts::from_items(&items),
            items,
        }
    }

    /// Returns batch progress and ETA.
    pub async fn progress(&self) -> Progress {
        let items = self.inner.store.snapshot().await;
        Progress::from_items(&items, self.inner.config.eta_calibration_factor)
    }

    /// Marks the run active, clearing pause and cancel.
    ///
    /// Returns `None` if a run is already active.
    fn begin(&self) -> Option<RunGuard> {
        let started = self.inner.control.send_if_modified(|c| {
            if c.running {
                return false;
            }
            c.running = true;
            c.paused = false;
            c.cancel_requested = false;
            true
        });

        if started {
            Some(RunGuard(Arc::clone(&self.inner)))
        } else {
            debug!("Queue already running");
            None
        }
    }

    async fn run_loop(&self) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut control = self.inner.control.subscribe();

        let queued = self.inner.store.len().await;
        info!(items = queued, "Queue run started");

        loop {
            if control.borrow_and_update().cancel_requested {
                summary.cancelled = true;
                break;
            }

            if control.borrow().paused {
                debug!("Waiting for resume");
            }
            if control
                .wait_for(|c| !c.paused || c.cancel_requested)
                .await
                .is_err()
            {
                break;
            }
            if control.borrow().cancel_requested {
                summary.cancelled = true;
                break;
            }

            let may_start = || {
                let c = *self.inner.control.borrow();
                !c.paused && !c.cancel_requested
            };
            let (index, item) = match self.inner.store.start_next(may_start).await {
                NextItem::Started(index, item) => (index, item),
                // Paused or cancelled while we took the lock; re-check at the top.
                NextItem::Held => continue,
                NextItem::Exhausted => break,
            };

            self.inner
                .control
                .send_modify(|c| c.current_index = Some(index));
            summary.processed += 1;
            debug!(id = %item.id, index, "Generating queue item");

            let outcome = self.generate(&item).await;
            match &outcome {
                Ok(output) => {
                    summary.completed += 1;
                    info!(
                        id = %item.id,
                        duration = output.duration_seconds,
                        path = %output.path.display(),
                        "Queue item completed"
                    );
                }
                Err(error) => {
                    summary.failed += 1;
                    warn!(id = %item.id, %error, "Queue item failed");
                }
            }

            if !self.inner.store.finish(item.id, outcome).await {
                warn!(id = %item.id, "Queue item was removed during generation");
            }
        }

        summary.elapsed = started.elapsed();
        info!(
            processed = summary.processed,
            completed = summary.completed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Queue run finished"
        );
        summary
    }

    /// Invokes the generator, folding errors, panics and timeouts into a message.
    async fn generate(&self, item: &QueueItem) -> Result<GeneratedAudio, String> {
        let call = AssertUnwindSafe(self.inner.generator.generate(item)).catch_unwind();

        let result = match self.inner.config.generation_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(format!(
                        "generation timed out after {:.1}s",
                        limit.as_secs_f64()
                    ));
                }
            },
            None => call.await,
        };

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(error)) => Err(format!("{error:#}")),
            Err(panic) => Err(panic_message(panic.as_ref())),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned());
    detail.map_or_else(
        || "generation panicked".to_string(),
        |msg| format!("generation panicked: {msg}"),
    )
}
