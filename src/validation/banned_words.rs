/*!
 * Banned-word list loading and substring scanning.
 *
 * Matching is plain substring containment on normalized text: a banned term
 * matches even inside a longer word. Any hit fails validation.
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::debug;

use super::normalize::normalize;
use crate::errors::ContentError;

/// Immutable, normalized list of banned terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannedWordList {
    words: Vec<String>,
}

impl BannedWordList {
    /// Build from raw terms; each is normalized the same way as scanned text
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a word-list resource: one term per line, `#` comments and blank lines ignored
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a word-list file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ContentError::ResourceLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let list = Self::parse(&content);
        debug!("Loaded {} banned words from {}", list.len(), path.display());
        Ok(list)
    }

    /// Terms in load order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Distinct terms contained in `normalized_text`
    pub fn scan(&self, normalized_text: &str) -> BTreeSet<String> {
        scan(normalized_text, &self.words)
    }
}

/// Distinct banned terms found as substrings of `normalized_text`
pub fn scan<S: AsRef<str>>(normalized_text: &str, banned_words: &[S]) -> BTreeSet<String> {
    banned_words
        .iter()
        .filter_map(|word| {
            let word: &str = word.as_ref();
            (!word.is_empty() && normalized_text.contains(word)).then(|| word.to_string())
        })
        .collect()
}
