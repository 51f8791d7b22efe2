/*!
 * Sentence repetition analysis.
 *
 * Two independent spam signals are derived from the same sentence counts:
 * - the highest number of times any single sentence occurs
 * - the ratio of distinct sentences to total sentences
 */

use std::collections::HashMap;

use log::debug;

/// Default count at which one repeated sentence fails validation
pub const DEFAULT_MAX_SENTENCE_REPEAT: usize = 200;

/// Default distinct/total ratio below which text counts as spam
pub const DEFAULT_MIN_UNIQUE_SENTENCE_RATIO: f64 = 0.01;

/// How many of the most repeated sentences are kept
pub const TOP_REPEATED_LIMIT: usize = 5;

/// Configurable repetition thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepetitionThresholds {
    /// A sentence occurring at least this often is a violation
    pub max_sentence_repeat: usize,
    /// A uniqueness ratio strictly below this is a violation
    pub min_unique_sentence_ratio: f64,
}

impl Default for RepetitionThresholds {
    fn default() -> Self {
        Self {
            max_sentence_repeat: DEFAULT_MAX_SENTENCE_REPEAT,
            min_unique_sentence_ratio: DEFAULT_MIN_UNIQUE_SENTENCE_RATIO,
        }
    }
}

/// Result of analyzing a sentence sequence
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionStats {
    /// Number of sentences analyzed
    pub total: usize,
    /// Number of distinct sentences
    pub distinct: usize,
    /// Highest occurrence count of any sentence (0 when empty)
    pub max_repeat: usize,
    /// distinct / total, 1.0 when there are no sentences
    pub unique_ratio: f64,
    /// Most repeated sentences, count descending, first occurrence breaks ties
    pub top_repeated: Vec<(String, usize)>,
}

impl RepetitionStats {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Whether the most repeated sentence reaches the threshold
    pub fn exceeds_repeat(&self, thresholds: &RepetitionThresholds) -> bool {
        !self.is_empty() && self.max_repeat >= thresholds.max_sentence_repeat
    }

    /// Whether the uniqueness ratio falls below the threshold
    pub fn below_uniqueness(&self, thresholds: &RepetitionThresholds) -> bool {
        !self.is_empty() && self.unique_ratio < thresholds.min_unique_sentence_ratio
    }
}

/// Count exact-match sentence frequencies.
pub fn analyze<'a, I>(sentences: I) -> RepetitionStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    let mut total = 0usize;

    for sentence in sentences {
        total += 1;
        match index.get(sentence) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(sentence, counts.len());
                counts.push((sentence, 1));
            }
        }
    }

    if total == 0 {
        return RepetitionStats {
            total: 0,
            distinct: 0,
            max_repeat: 0,
            unique_ratio: 1.0,
            top_repeated: Vec::new(),
        };
    }

    let distinct = counts.len();
    let unique_ratio = distinct as f64 / total as f64;

    // Stable sort keeps first-occurrence order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let max_repeat = counts.first().map(|(_, c)| *c).unwrap_or(0);
    let top_repeated = counts
        .into_iter()
        .take(TOP_REPEATED_LIMIT)
        .map(|(s, c)| (s.to_string(), c))
        .collect();

    debug!(
        "Repetition: {} sentences, {} distinct, max repeat {}, ratio {:.4}",
        total, distinct, max_repeat, unique_ratio
    );

    RepetitionStats {
        total,
        distinct,
        max_repeat,
        unique_ratio,
        top_repeated,
    }
}
