//! Display utilities and output formatting for the voxqueue CLI.

use anyhow::Result;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use voxqueue_lib::{Ingested, QueueItem, QueueStatus, RunSummary};

/// Output format for listings.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Table,
    Json,
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let head: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// Formats seconds as `1h 02m 03s`, `2m 03s` or `3.4s`.
pub(crate) fn format_seconds(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "-".to_string();
    }
    if secs < 60.0 {
        return format!("{secs:.1}s");
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = secs.round() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

fn item_row(index: usize, item: &QueueItem) -> String {
    format!(
        "{:>4}  {:<10}  {:<8}  {:<20}  {}",
        index + 1,
        item.status.as_str(),
        truncate(&item.engine, 8),
        truncate(&item.voice.label(), 20),
        truncate(&item.text, 50)
    )
}

/// Prints an ingestion result.
pub(crate) fn print_ingested(ingested: &Ingested, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let skipped: Vec<_> = ingested
                .skipped
                .iter()
                .map(|s| serde_json::json!({ "record": s.record, "reason": s.reason.to_string() }))
                .collect();
            let doc = serde_json::json!({ "items": ingested.items, "skipped": skipped });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Format::Table => {
            println!(
                "{:>4}  {:<10}  {:<8}  {:<20}  TEXT",
                "#", "STATUS", "ENGINE", "VOICE"
            );
            for (i, item) in ingested.items.iter().enumerate() {
                println!("{}", item_row(i, item));
            }
            println!(
                "\n{} items from {} records",
                ingested.len(),
                ingested.records_seen()
            );
            for skipped in &ingested.skipped {
                println!("  skipped record {}: {}", skipped.record, skipped.reason);
            }
        }
    }
    Ok(())
}

/// Prints a queue status snapshot.
pub(crate) fn print_status(status: &QueueStatus) {
    let state = if !status.is_running {
        "idle"
    } else if status.cancel_requested {
        "cancelling"
    } else if status.is_paused {
        "paused"
    } else {
        "running"
    };
    println!(
        "Queue {state}: {} total, {} pending, {} processing, {} completed, {} failed, {} cancelled",
        status.total,
        status.counts.pending,
        status.counts.processing,
        status.counts.completed,
        status.counts.failed,
        status.counts.cancelled
    );
    if let Some(index) = status.current_index
        && let Some(item) = status.items.get(index)
    {
        println!("Current: {}", item_row(index, item));
    }
}

/// Prints the outcome of a run, including failed items.
pub(crate) fn print_summary(summary: &RunSummary, items: &[QueueItem]) {
    let verb = if summary.cancelled { "cancelled" } else { "finished" };
    println!(
        "Run {verb} in {}: {} processed, {} completed, {} failed",
        format_seconds(summary.elapsed.as_secs_f64()),
        summary.processed,
        summary.completed,
        summary.failed
    );
    let audio: f64 = items.iter().filter_map(QueueItem::duration_seconds).sum();
    if audio > 0.0 {
        println!("Generated {} of audio", format_seconds(audio));
    }
    for (i, item) in items.iter().enumerate() {
        if let Some(error) = &item.error {
            println!("  failed #{}: {} ({})", i + 1, truncate(&item.text, 40), error);
        }
    }
}

/// Creates the run progress bar, hidden in quiet mode.
pub(crate) fn progress_bar(total: usize, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%) {msg}",
            )?
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(200));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer sentence", 10), "a much ...");
        assert_eq!(truncate("two\nlines", 20), "two lines");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(3.42), "3.4s");
        assert_eq!(format_seconds(123.0), "2m 03s");
        assert_eq!(format_seconds(3723.0), "1h 02m 03s");
        assert_eq!(format_seconds(f64::NAN), "-");
    }
}
