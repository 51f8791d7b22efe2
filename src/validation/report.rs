/*!
 * Validation report and its error taxonomy.
 *
 * The report is plain data handed to the persistence collaborator; its JSON
 * form tags each error with `type`.
 */

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Longest sentence prefix kept in a repetition example
pub const EXAMPLE_PREFIX_CHARS: usize = 120;

/// A repeated sentence, as surfaced in a DuplicateSentence error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatExample {
    /// First characters of the sentence
    pub sentence: String,
    /// How many times it occurred
    pub count: usize,
}

impl RepeatExample {
    pub fn new(sentence: &str, count: usize) -> Self {
        Self {
            sentence: sentence.chars().take(EXAMPLE_PREFIX_CHARS).collect(),
            count,
        }
    }
}

/// One failed content check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ErrorEntry {
    /// Banned terms found in the normalized text
    #[serde(rename = "BANNED_WORDS")]
    BannedWords { hits: BTreeSet<String> },

    /// Raw markup length outside the window
    #[serde(rename = "CHAR_COUNT")]
    CharCount {
        #[serde(rename = "char_count")]
        count: usize,
        min: usize,
        max: usize,
    },

    /// A sentence repeated at least `threshold` times
    #[serde(rename = "DUP_SENTENCE")]
    DuplicateSentence {
        max_repeat: usize,
        threshold: usize,
        examples: Vec<RepeatExample>,
    },

    /// Too few distinct sentences
    #[serde(rename = "LOW_UNIQUENESS")]
    LowUniqueness {
        #[serde(rename = "unique_ratio")]
        ratio: f64,
        threshold: f64,
    },
}

impl ErrorEntry {
    /// Persisted type tag
    pub fn kind(&self) -> &'static str {
        match self {
            ErrorEntry::BannedWords { .. } => "BANNED_WORDS",
            ErrorEntry::CharCount { .. } => "CHAR_COUNT",
            ErrorEntry::DuplicateSentence { .. } => "DUP_SENTENCE",
            ErrorEntry::LowUniqueness { .. } => "LOW_UNIQUENESS",
        }
    }
}

impl std::fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorEntry::BannedWords { hits } => {
                let hits: Vec<&str> = hits.iter().map(String::as_str).collect();
                write!(f, "Banned words found: {}", hits.join(", "))
            }
            ErrorEntry::CharCount { count, min, max } => {
                write!(f, "Length {} outside [{}, {}]", count, min, max)
            }
            ErrorEntry::DuplicateSentence {
                max_repeat,
                threshold,
                ..
            } => write!(
                f,
                "A sentence repeats {} times (threshold {})",
                max_repeat, threshold
            ),
            ErrorEntry::LowUniqueness { ratio, threshold } => write!(
                f,
                "Unique sentence ratio {:.4} < {:.4}",
                ratio, threshold
            ),
        }
    }
}

/// Outcome of validating one markup string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff `errors` is empty
    pub ok: bool,
    /// Every failed check, in check order
    pub errors: Vec<ErrorEntry>,
    /// Raw markup length
    pub char_count: usize,
}

impl ValidationReport {
    /// Build a report; `ok` is derived from `errors`
    pub fn new(errors: Vec<ErrorEntry>, char_count: usize) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
            char_count,
        }
    }

    /// First error of the given type tag
    pub fn find(&self, kind: &str) -> Option<&ErrorEntry> {
        self.errors.iter().find(|e| e.kind() == kind)
    }

    /// Compact JSON for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted report
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
