/*!
 * Tests for the content validator
 */

use anyhow::Result;
use seogen::errors::ContentError;
use seogen::validation::repetition::RepetitionThresholds;
use seogen::validation::{
    BannedWordList, ErrorEntry, LengthWindow, ValidationPolicy, ValidationReport, Validator,
};

use crate::common;

const SENTENCE: &str = "This cotton tee keeps its shape after washing";

/// `n` copies of one sentence, the last one ending the text
fn repeated(n: usize) -> String {
    vec![format!("{}.", SENTENCE); n].join(" ")
}

fn repetition_validator(max_sentence_repeat: usize, min_unique_sentence_ratio: f64) -> Validator {
    Validator::new(
        BannedWordList::default(),
        ValidationPolicy {
            window: LengthWindow::new(1, 1_000_000).unwrap(),
            repetition: RepetitionThresholds {
                max_sentence_repeat,
                min_unique_sentence_ratio,
            },
        },
    )
}

#[test]
fn test_validate_withMiracleProduct_shouldReportBannedHit() {
    let validator = common::validator(100, 200, &["miracle"]);
    let markup = common::pad_to("<strong>This is a miracle product</strong>", 150);
    let report = validator.validate(&markup);

    assert!(!report.ok);
    match report.find("BANNED_WORDS") {
        Some(ErrorEntry::BannedWords { hits }) => {
            assert_eq!(hits.len(), 1);
            assert!(hits.contains("miracle"));
        }
        other => panic!("expected banned words, got {:?}", other),
    }
}

#[test]
fn test_validate_withBannedTermInsideWord_shouldStillHit() {
    let validator = common::validator(1, 1_000, &["cheap"]);
    let report = validator.validate("Not the CHEAPEST option.");
    assert!(report.find("BANNED_WORDS").is_some());
}

#[test]
fn test_validate_withLengthOutsideWindow_shouldReportExactCount() {
    let validator = common::validator(100, 120, &[]);
    for len in [99, 121] {
        let report = validator.validate(&"a".repeat(len));
        assert!(!report.ok);
        assert_eq!(
            report.find("CHAR_COUNT"),
            Some(&ErrorEntry::CharCount { count: len, min: 100, max: 120 })
        );
    }
    for len in [100, 120] {
        assert!(validator.validate(&"a".repeat(len)).ok, "length {}", len);
    }
}

#[test]
fn test_validate_shouldCountCharactersNotBytes() {
    let validator = common::validator(5, 5, &[]);
    let report = validator.validate("çğüşö");
    assert!(report.ok);
    assert_eq!(report.char_count, 5);
}

#[test]
fn test_validate_withRepeatAtThreshold_shouldReportDuplicate() {
    let report = repetition_validator(3, 0.0).validate(&repeated(3));
    match report.find("DUP_SENTENCE") {
        Some(ErrorEntry::DuplicateSentence { max_repeat, threshold, examples }) => {
            assert_eq!(*max_repeat, 3);
            assert_eq!(*threshold, 3);
            assert_eq!(examples.len(), 1);
            assert_eq!(examples[0].count, 3);
        }
        other => panic!("expected duplicate sentence, got {:?}", other),
    }
    assert!(repetition_validator(4, 0.0).validate(&repeated(3)).ok);
}

#[test]
fn test_validate_withManyRepeatedSentences_shouldKeepAtMostFiveExamples() {
    let mut text = String::new();
    for i in 0..7 {
        for _ in 0..2 {
            text.push_str(&format!("Repeated sentence number {} for testing. ", i));
        }
    }

    let report = repetition_validator(2, 0.0).validate(&text);
    match report.find("DUP_SENTENCE") {
        Some(ErrorEntry::DuplicateSentence { examples, .. }) => {
            assert_eq!(examples.len(), 5);
            assert!(examples[0].sentence.contains("number 0"));
        }
        other => panic!("expected duplicate sentence, got {:?}", other),
    }
}

#[test]
fn test_validate_withRepeatInsideMarkup_shouldCountEveryCopy() {
    let markup = format!("<strong>{s}.</strong><br/>{s}! <li>{s}.</li>", s = SENTENCE);
    match repetition_validator(3, 0.0).validate(&markup).find("DUP_SENTENCE") {
        Some(ErrorEntry::DuplicateSentence { max_repeat, .. }) => assert_eq!(*max_repeat, 3),
        other => panic!("expected duplicate sentence, got {:?}", other),
    }
}

#[test]
fn test_validate_uniqueRatio_shouldBeOneOverN() {
    let report = repetition_validator(1_000, 0.5).validate(&repeated(4));
    match report.find("LOW_UNIQUENESS") {
        Some(ErrorEntry::LowUniqueness { ratio, threshold }) => {
            assert!((ratio - 0.25).abs() < 1e-9);
            assert!((threshold - 0.5).abs() < 1e-9);
        }
        other => panic!("expected low uniqueness, got {:?}", other),
    }
}

#[test]
fn test_validate_withDistinctSentences_shouldHaveFullUniqueness() {
    let text = "The first sentence is long enough. The second sentence is also long. \
                The third sentence closes the text.";
    let report = repetition_validator(2, 1.0).validate(text);
    assert!(report.ok, "{:?}", report.errors);
}

#[test]
fn test_validate_withEmptyMarkup_shouldOnlyFailLength() {
    let report = common::validator(10, 20, &["miracle"]).validate("");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind(), "CHAR_COUNT");
}

#[test]
fn test_report_json_shouldUsePersistedFieldNames() -> Result<()> {
    let validator = common::validator(1_000, 2_000, &["miracle"]);
    let report = validator.validate("A miracle.");
    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    assert_eq!(json["ok"], false);
    assert_eq!(json["errors"][0]["type"], "BANNED_WORDS");
    assert_eq!(json["errors"][0]["hits"][0], "miracle");
    assert_eq!(json["errors"][1]["type"], "CHAR_COUNT");
    assert_eq!(json["errors"][1]["char_count"], 10);

    let parsed = ValidationReport::from_json(&report.to_json()?)?;
    assert_eq!(parsed, report);
    Ok(())
}

#[test]
fn test_fromPath_withWordFile_shouldSkipCommentsAndBlanks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_banned_words_file(temp_dir.path(), &["Miracle", "  risk-free  "])?;
    let validator = Validator::from_path(&path, ValidationPolicy::default())?;
    assert_eq!(validator.banned_words().words(), ["miracle", "risk-free"]);
    Ok(())
}

#[test]
fn test_fromPath_withMissingFile_shouldFailLoudly() {
    let result = Validator::from_path("does/not/exist.txt", ValidationPolicy::default());
    assert!(matches!(result, Err(ContentError::ResourceLoad { .. })));
}
