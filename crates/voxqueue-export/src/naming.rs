//! Archive entry naming.

use voxqueue_types::QueueItem;

/// Number of text characters used for entry names.
pub const DEFAULT_PREFIX_CHARS: usize = 30;

/// Returns the first `max_chars` characters of `text`, keeping only
/// alphanumerics, spaces, hyphens and underscores.
#[must_use]
pub fn sanitize_prefix(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect()
}

/// Returns the archive entry name for an item, e.g. `007_Hello there.wav`.
///
/// `index` is 1-based. Returns `None` if the item has no output.
#[must_use]
pub fn entry_name(index: usize, item: &QueueItem, max_chars: usize) -> Option<String> {
    let output = item.output.as_ref()?;
    Some(format!(
        "{index:03}_{}{}",
        sanitize_prefix(&item.text, max_chars),
        output.extension()
    ))
}
