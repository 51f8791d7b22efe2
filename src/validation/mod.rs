/*!
 * Validation module for generated product descriptions.
 *
 * This module decides whether a description is acceptable:
 * - Banned-word scanning (substring match, always fatal to the verdict)
 * - Length window on the raw markup
 * - Sentence repetition and uniqueness
 *
 * # Architecture
 *
 * - `normalize`: Canonical lowercase text without markup
 * - `sentences`: Sentence segmentation with a noise filter
 * - `banned_words`: Word-list loading and scanning
 * - `repetition`: Sentence frequency statistics
 * - `length`: Character window, deltas and truncation
 * - `report`: Report and error taxonomy
 * - `service`: Orchestrates all checks
 */

pub mod banned_words;
pub mod length;
pub mod normalize;
pub mod repetition;
pub mod report;
pub mod sentences;
pub mod service;

// Re-export main types
pub use banned_words::BannedWordList;
pub use length::LengthWindow;
pub use repetition::RepetitionThresholds;
pub use report::{ErrorEntry, RepeatExample, ValidationReport};
pub use service::{ValidationPolicy, Validator};
