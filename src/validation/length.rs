/*!
 * Length validation for generated markup.
 *
 * This module checks the raw markup length (tags included) against a
 * closed character window and exposes how far a text is from it:
 * - `deficit`: characters still missing to reach the minimum
 * - `overflow`: characters beyond the maximum
 */

use log::debug;

use super::report::ErrorEntry;
use crate::errors::ContentError;

/// Default minimum markup length
pub const DEFAULT_MIN_CHARS: usize = 25_000;

/// Default maximum markup length
pub const DEFAULT_MAX_CHARS: usize = 27_000;

/// Marker appended to truncated markup
pub const ELLIPSIS: &str = "...";

/// Closed interval `[min_chars, max_chars]` of acceptable markup lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthWindow {
    /// Minimum acceptable length
    pub min_chars: usize,
    /// Maximum acceptable length
    pub max_chars: usize,
}

impl Default for LengthWindow {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl LengthWindow {
    /// Create a window, rejecting an inverted or too narrow one
    pub fn new(min_chars: usize, max_chars: usize) -> Result<Self, ContentError> {
        if max_chars < min_chars {
            return Err(ContentError::InvalidPolicy(format!(
                "max_chars ({}) is below min_chars ({})",
                max_chars, min_chars
            )));
        }
        if max_chars < ELLIPSIS.len() {
            return Err(ContentError::InvalidPolicy(format!(
                "max_chars ({}) cannot hold the truncation marker",
                max_chars
            )));
        }
        Ok(Self { min_chars, max_chars })
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min_chars..=self.max_chars).contains(&len)
    }

    /// Characters missing to reach the minimum
    pub fn deficit(&self, len: usize) -> usize {
        self.min_chars.saturating_sub(len)
    }

    /// Characters beyond the maximum
    pub fn overflow(&self, len: usize) -> usize {
        len.saturating_sub(self.max_chars)
    }

    /// CharCount error when `markup_len` lies outside the window
    pub fn check(&self, markup_len: usize) -> Option<ErrorEntry> {
        check(markup_len, self.min_chars, self.max_chars)
    }

    /// Cut markup longer than `max_chars` down to exactly `max_chars`, ending in `...`
    pub fn truncate(&self, markup: String) -> String {
        truncate_with_ellipsis(markup, self.max_chars)
    }
}

/// CharCount error when `markup_len` lies outside `[min, max]`
pub fn check(markup_len: usize, min: usize, max: usize) -> Option<ErrorEntry> {
    if markup_len < min || markup_len > max {
        debug!("Length {} outside [{}, {}]", markup_len, min, max);
        Some(ErrorEntry::CharCount {
            count: markup_len,
            min,
            max,
        })
    } else {
        None
    }
}

/// Truncate to `max_chars - 3` characters plus the ellipsis marker.
///
/// Markup already within `max_chars` is returned untouched.
pub fn truncate_with_ellipsis(markup: String, max_chars: usize) -> String {
    if markup.chars().count() <= max_chars {
        return markup;
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let cut = markup
        .char_indices()
        .nth(keep)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(markup.len());
    let mut truncated = markup;
    truncated.truncate(cut);
    truncated.push_str(ELLIPSIS);
    truncated
}
