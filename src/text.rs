//! Text utilities: whitespace normalization, word counts, reading time.

use std::time::Duration;

use crate::patterns::{INLINE_WHITESPACE, MULTIPLE_NEWLINES, WHITESPACE_NORMALIZE};

/// Reading speed used for the reading-time estimate. 200 words per
/// minute sits at the low end of measured adult silent-reading rates, so
/// estimates skew generous rather than optimistic.
pub const WORDS_PER_MINUTE: u64 = 200;

/// Collapse all whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").into_owned()
}

/// Tidy multi-line output: per-line inline whitespace collapsed and
/// trimmed, runs of blank lines reduced to one, ends trimmed.
#[must_use]
pub fn tidy_block_text(text: &str) -> String {
    let collapsed = INLINE_WHITESPACE.replace_all(text, " ");
    let mut lines = String::with_capacity(collapsed.len());
    for line in collapsed.lines() {
        lines.push_str(line.trim());
        lines.push('\n');
    }
    MULTIPLE_NEWLINES.replace_all(&lines, "\n\n").trim().to_string()
}

/// Length of a string in non-whitespace characters.
///
/// Additive across concatenation, unlike normalized lengths, which keeps
/// parent-minus-children arithmetic on DOM text exact.
#[must_use]
pub(crate) fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Count words of at least `min_length` characters.
///
/// Tokens are whitespace-delimited. With `min_length` of 1 the count is
/// zero exactly when the text contains no non-whitespace characters.
#[must_use]
pub fn count_words(text: &str, min_length: usize) -> usize {
    text.split_whitespace()
        .filter(|word| word.chars().count() >= min_length)
        .count()
}

/// Estimate reading time for a word count, rounded up to whole seconds.
/// Any nonzero word count yields at least one second.
#[must_use]
pub fn reading_time(words: usize) -> Duration {
    if words == 0 {
        return Duration::ZERO;
    }
    let secs = (words as u64 * 60).div_ceil(WORDS_PER_MINUTE);
    Duration::from_secs(secs.max(1))
}
