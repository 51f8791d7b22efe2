/*!
 * Validation service that orchestrates all content checks.
 *
 * This module provides a unified interface for running every check on a
 * generated description. Checks never short-circuit, so the report lists
 * all simultaneous failures.
 */

use std::path::Path;

use log::debug;

use super::banned_words::BannedWordList;
use super::length::LengthWindow;
use super::normalize::{markup_len, normalize};
use super::repetition::{analyze, RepetitionThresholds};
use super::report::{ErrorEntry, RepeatExample, ValidationReport};
use super::sentences::segment;
use crate::app_config::ContentConfig;
use crate::errors::ContentError;

/// Policy constants a validator is built with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidationPolicy {
    /// Accepted raw markup length
    pub window: LengthWindow,
    /// Repetition limits
    pub repetition: RepetitionThresholds,
}

impl ValidationPolicy {
    /// Build the policy from the content section of the configuration
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        if config.max_sentence_repeat == 0 {
            return Err(ContentError::InvalidPolicy(
                "max_sentence_repeat must be positive".to_string(),
            ));
        }
        Ok(Self {
            window: LengthWindow::new(config.min_chars, config.max_chars)?,
            repetition: RepetitionThresholds {
                max_sentence_repeat: config.max_sentence_repeat,
                min_unique_sentence_ratio: config.min_unique_sentence_ratio,
            },
        })
    }
}

/// Content validator holding the loaded word list and policy constants
#[derive(Debug, Clone)]
pub struct Validator {
    banned_words: BannedWordList,
    policy: ValidationPolicy,
}

impl Validator {
    /// Create a validator from an already loaded word list
    pub fn new(banned_words: BannedWordList, policy: ValidationPolicy) -> Self {
        Self {
            banned_words,
            policy,
        }
    }

    /// Create a validator, loading the word list from disk.
    ///
    /// A missing or unreadable list is fatal.
    pub fn from_path<P: AsRef<Path>>(path: P, policy: ValidationPolicy) -> Result<Self, ContentError> {
        Ok(Self::new(BannedWordList::from_file(path)?, policy))
    }

    /// Create a validator from the content configuration
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        let policy = ValidationPolicy::from_config(config)?;
        Self::from_path(&config.banned_words_path, policy)
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn banned_words(&self) -> &BannedWordList {
        &self.banned_words
    }

    /// Run every check on `markup` and collect the failures
    pub fn validate(&self, markup: &str) -> ValidationReport {
        let normalized = normalize(markup);
        let char_count = markup_len(markup);
        let mut errors = Vec::new();

        let hits = self.banned_words.scan(&normalized);
        if !hits.is_empty() {
            errors.push(ErrorEntry::BannedWords { hits });
        }

        if let Some(error) = self.policy.window.check(char_count) {
            errors.push(error);
        }

        let thresholds = &self.policy.repetition;
        let stats = analyze(segment(&normalized));
        if stats.exceeds_repeat(thresholds) {
            errors.push(ErrorEntry::DuplicateSentence {
                max_repeat: stats.max_repeat,
                threshold: thresholds.max_sentence_repeat,
                examples: stats
                    .top_repeated
                    .iter()
                    .map(|(sentence, count)| RepeatExample::new(sentence, *count))
                    .collect(),
            });
        }
        if stats.below_uniqueness(thresholds) {
            errors.push(ErrorEntry::LowUniqueness {
                ratio: stats.unique_ratio,
                threshold: thresholds.min_unique_sentence_ratio,
            });
        }

        debug!(
            "Validated {} chars: {} error(s), {} sentence(s)",
            char_count,
            errors.len(),
            stats.total
        );

        ValidationReport::new(errors, char_count)
    }
}
