/*!
 * Canonical text form shared by banned-word scanning and sentence segmentation.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace every `<...>` tag with a single space
pub fn strip_markup(raw: &str) -> String {
    MARKUP_TAG.replace_all(raw, " ").into_owned()
}

/// Collapse whitespace runs to one space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Strip markup, collapse whitespace, trim and lowercase.
pub fn normalize(raw: &str) -> String {
    collapse_whitespace(&strip_markup(raw)).to_lowercase()
}

/// Markup length as the validator and both generators count it
pub fn markup_len(markup: &str) -> usize {
    markup.chars().count()
}
