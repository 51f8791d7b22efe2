/*!
 * Sentence segmentation over normalized text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Fragments shorter than this (after trimming) are noise, not sentences
pub const MIN_SENTENCE_CHARS: usize = 20;

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split normalized text on `.`, `!` or `?` followed by whitespace.
///
/// Every fragment comes out without its terminator, including the last one
/// whose punctuation the split never consumes.
pub fn segment(normalized_text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BREAK
        .split(normalized_text)
        .map(|fragment| strip_terminator(fragment.trim()))
        .filter(|fragment| fragment.chars().count() >= MIN_SENTENCE_CHARS)
}

/// Drop one trailing `.`, `!` or `?`
fn strip_terminator(fragment: &str) -> &str {
    fragment
        .strip_suffix(['.', '!', '?'])
        .map(str::trim_end)
        .unwrap_or(fragment)
}
