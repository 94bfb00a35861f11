//! Run command implementation.
//!
//! Ingests an input file, processes every item through the command-backed
//! generator and optionally packages the results into a ZIP archive.
//! While the run is active, `pause`, `resume`, `cancel` and `status` can be
//! typed on stdin. Ctrl-C cancels.

use crate::config::CliConfig;
use crate::display::{format_seconds, print_status, print_summary, progress_bar};
use crate::generator::CommandGenerator;
use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use voxqueue_lib::{ArchiveExporter, InputFormat, QueueStore, Scheduler, ingest_file};

/// Interactive commands read from stdin during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Cancel,
    Status,
}

impl Control {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "pause" | "p" => Some(Self::Pause),
            "resume" | "r" => Some(Self::Resume),
            "cancel" | "c" => Some(Self::Cancel),
            "status" | "s" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Reads control lines on a plain thread.
///
/// Blocking stdin reads cannot be cancelled, so the reader is kept off the
/// runtime and simply dropped when the process exits.
fn spawn_control_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Execute the run command.
pub(crate) async fn run(
    input: &Path,
    input_format: Option<InputFormat>,
    archive: Option<&Path>,
    config: &CliConfig,
    quiet: bool,
) -> Result<()> {
    let generator = CommandGenerator::from_config(&config.generator)?;

    let ingested = ingest_file(input, input_format, &config.ingest)
        .with_context(|| format!("Failed to ingest {}", input.display()))?;
    if !quiet {
        for skipped in &ingested.skipped {
            eprintln!("Skipped record {}: {}", skipped.record, skipped.reason);
        }
    }
    if ingested.is_empty() {
        bail!("No items to process in {}", input.display());
    }

    let store = QueueStore::new();
    let total = store.add_all(ingested.into_items()).await.len();
    info!(total, output_dir = %generator.output_dir().display(), "Queue loaded");

    let scheduler = Scheduler::new(store.clone(), Arc::new(generator), config.queue.clone());
    let Some(mut handle) = scheduler.spawn() else {
        bail!("A queue run is already active");
    };

    let pb = progress_bar(total, quiet)?;
    if !quiet {
        pb.println("Type pause, resume, cancel or status and press enter. Ctrl-C cancels.");
    }
    let mut controls = spawn_control_reader();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    let summary = loop {
        tokio::select! {
            result = &mut handle => break result.context("Queue run task failed")?,
            _ = tokio::signal::ctrl_c() => {
                pb.println("Cancelling...");
                scheduler.cancel().await;
            }
            Some(line) = controls.recv() => handle_control(&line, &scheduler, &pb).await,
            _ = ticker.tick() => update_progress(&scheduler, &pb).await,
        }
    };

    update_progress(&scheduler, &pb).await;
    pb.finish_and_clear();

    let items = store.snapshot().await;
    if !quiet {
        print_summary(&summary, &items);
    }

    if let Some(path) = archive {
        let exported = ArchiveExporter::new()
            .export_to_path(&items, path)
            .with_context(|| format!("Failed to write archive {}", path.display()))?;
        if !exported.skipped.is_empty() {
            warn!(missing = exported.skipped.len(), "Some outputs were missing from disk");
        }
        if !quiet {
            println!(
                "Archive written to: {} ({} files)",
                path.display(),
                exported.len()
            );
        }
    }

    Ok(())
}

async fn handle_control(line: &str, scheduler: &Scheduler, pb: &ProgressBar) {
    match Control::parse(line) {
        Some(Control::Pause) => {
            scheduler.pause();
            pb.println("Paused. The current item will finish first.");
        }
        Some(Control::Resume) => {
            scheduler.resume();
            pb.println("Resumed.");
        }
        Some(Control::Cancel) => {
            let cancelled = scheduler.cancel().await;
            pb.println(format!("Cancelling, {cancelled} pending items dropped."));
        }
        Some(Control::Status) => {
            let status = scheduler.status().await;
            pb.suspend(|| print_status(&status));
        }
        None if line.trim().is_empty() => {}
        None => pb.println(format!("Unknown command: {}", line.trim())),
    }
}

async fn update_progress(scheduler: &Scheduler, pb: &ProgressBar) {
    let counts = scheduler.store().counts().await;
    let progress = scheduler.progress().await;

    pb.set_length(counts.total() as u64);
    pb.set_position((counts.completed + counts.failed + counts.cancelled) as u64);

    let mut message = match progress.eta_seconds {
        Some(eta) if counts.pending + counts.processing > 0 => {
            format!("ETA {}", format_seconds(eta))
        }
        _ => String::new(),
    };
    if counts.failed > 0 {
        message.push_str(&format!(" {} failed", counts.failed));
    }
    if scheduler.is_paused() {
        message.push_str(" [paused]");
    }
    pb.set_message(message.trim().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_parse() {
        assert_eq!(Control::parse("pause"), Some(Control::Pause));
        assert_eq!(Control::parse("  RESUME \n"), Some(Control::Resume));
        assert_eq!(Control::parse("c"), Some(Control::Cancel));
        assert_eq!(Control::parse("status"), Some(Control::Status));
        assert_eq!(Control::parse("stop"), None);
    }
}
