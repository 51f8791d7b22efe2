/*!
 * Tests for catalog records, image URL parsing and attempt history
 */

use std::sync::Arc;

use seogen::catalog::{
    parse_image_urls, AttemptLedger, CatalogEntry, GenerationAttempt, GenerationStatus,
};
use seogen::validation::{ErrorEntry, ValidationReport};

fn attempt(sku: &str, ok: bool) -> GenerationAttempt {
    let errors = if ok {
        Vec::new()
    } else {
        vec![ErrorEntry::CharCount { count: 10, min: 20, max: 30 }]
    };
    GenerationAttempt::new(sku, "<strong>x</strong>".to_string(), ValidationReport::new(errors, 18))
}

#[test]
fn test_parseImageUrls_shouldFollowFormatPrecedence() {
    assert_eq!(
        parse_image_urls(Some(r#"["https://a/1.jpg", "https://a/2.jpg"]"#)),
        vec!["https://a/1.jpg", "https://a/2.jpg"]
    );
    assert_eq!(
        parse_image_urls(Some("https://a/1.jpg | https://a/2.jpg")),
        vec!["https://a/1.jpg", "https://a/2.jpg"]
    );
    assert_eq!(
        parse_image_urls(Some("https://a/1.jpg,https://a/2.jpg,")),
        vec!["https://a/1.jpg", "https://a/2.jpg"]
    );
    assert_eq!(parse_image_urls(Some("https://a/1.jpg")), vec!["https://a/1.jpg"]);
}

#[test]
fn test_parseImageUrls_withPipeAndComma_shouldSplitOnPipe() {
    let urls = parse_image_urls(Some("https://a/x,y.jpg|https://a/z.jpg"));
    assert_eq!(urls, vec!["https://a/x,y.jpg", "https://a/z.jpg"]);
}

#[test]
fn test_parseImageUrls_withEmptyOrJunk_shouldBeEmpty() {
    assert!(parse_image_urls(None).is_empty());
    assert!(parse_image_urls(Some("   ")).is_empty());
    assert!(parse_image_urls(Some("not a url")).is_empty());
    assert!(parse_image_urls(Some("[]")).is_empty());
}

#[test]
fn test_catalogEntry_deserialize_shouldNormalizeImageField() {
    let json = r#"[
        {"merchant_sku": "A1", "title": "Mug", "image_urls": "https://a/1.jpg|https://a/1.jpg"},
        {"merchant_sku": "B2", "title": "Tee", "brand": " ", "image_urls": ["https://b/1.jpg"]},
        {"merchant_sku": "C3", "title": "Cap"}
    ]"#;
    let entries: Vec<CatalogEntry> = serde_json::from_str(json).unwrap();
    assert_eq!(entries[0].product.image_urls, vec!["https://a/1.jpg"]);
    assert_eq!(entries[1].product.image_urls, vec!["https://b/1.jpg"]);
    assert_eq!(entries[1].product.brand(), None);
    assert!(entries[2].product.image_urls.is_empty());
}

#[test]
fn test_generationStatus_shouldRoundTripPersistedForm() {
    assert_eq!(GenerationStatus::Pass.to_string(), "PASS");
    assert_eq!("FAIL".parse::<GenerationStatus>().unwrap(), GenerationStatus::Fail);
    assert_eq!(serde_json::to_string(&GenerationStatus::Pass).unwrap(), "\"PASS\"");
    assert!("MAYBE".parse::<GenerationStatus>().is_err());
}

#[test]
fn test_attempt_statusShouldMirrorReport() {
    assert_eq!(attempt("A", true).status, GenerationStatus::Pass);
    assert_eq!(attempt("A", false).status, GenerationStatus::Fail);
}

#[test]
fn test_ledger_shouldNumberVersionsPerSku() {
    let ledger = AttemptLedger::new();
    assert_eq!(ledger.next_version("A"), 1);
    assert_eq!(ledger.record(attempt("A", false)), 1);
    assert_eq!(ledger.record(attempt("B", true)), 1);
    assert_eq!(ledger.record(attempt("A", true)), 2);

    assert!(ledger.has_pass("A"));
    assert_eq!(ledger.latest("A").unwrap().version, 2);
    assert_eq!(ledger.attempts("A").len(), 2);

    let snapshot: Vec<(String, u32)> = ledger
        .snapshot()
        .into_iter()
        .map(|a| (a.merchant_sku, a.version))
        .collect();
    assert_eq!(
        snapshot,
        vec![("A".to_string(), 1), ("A".to_string(), 2), ("B".to_string(), 1)]
    );
}

#[test]
fn test_ledger_withParallelWriters_shouldAssignDistinctVersions() {
    let ledger = Arc::new(AttemptLedger::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || ledger.record(attempt("SHARED", false)))
        })
        .collect();

    let mut versions: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    versions.sort();
    assert_eq!(versions, (1..=8).collect::<Vec<u32>>());
    assert!(!ledger.has_pass("SHARED"));
}
