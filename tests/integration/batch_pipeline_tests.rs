/*!
 * End-to-end catalog batch runs
 */

use std::sync::Arc;

use anyhow::Result;
use seogen::catalog::{AttemptLedger, CatalogEntry, GenerationStatus};
use seogen::errors::FallbackTrigger;
use seogen::generation::{FallbackReason, LlmGenerator, StubGenerator};
use seogen::pipeline::{BatchOptions, BatchSummary, DescriptionSource, GenerationPipeline};
use seogen::providers::mock::MockProvider;
use seogen::validation::LengthWindow;

use crate::common;

const CATALOG: &str = r#"[
    {"merchant_sku": "TS-001", "title": "Basic T-Shirt", "brand": "Acme",
     "category_path": "Clothing/Tops", "image_urls": "https://cdn/ts-1.jpg|https://cdn/ts-2.jpg"},
    {"merchant_sku": "MG-002", "title": "Ceramic Mug", "brand": "Potter & Sons",
     "category_path": "Home/Kitchen", "old_description": "Stoneware, 350 ml.",
     "image_urls": ["https://cdn/mg-1.jpg"]},
    {"merchant_sku": "CP-003", "title": "Miracle Cap", "barcode": "8690000000003"}
]"#;

fn catalog() -> Vec<CatalogEntry> {
    serde_json::from_str(CATALOG).unwrap()
}

fn stub_pipeline(banned: &[&str]) -> GenerationPipeline {
    let window = LengthWindow::new(500, 600).unwrap();
    GenerationPipeline::new(
        DescriptionSource::Stub(StubGenerator::new(window, false)),
        Arc::new(common::validator(500, 600, banned)),
        Arc::new(AttemptLedger::new()),
    )
    .with_concurrency(2)
}

#[tokio::test]
async fn test_runBatch_withStubSource_shouldRecordPassAndFail() {
    common::init_logging();
    let pipeline = stub_pipeline(&["miracle"]);
    let summary = pipeline.run_batch(&catalog(), &BatchOptions::default(), None).await;

    assert_eq!(
        summary,
        BatchSummary {
            processed: 3,
            skipped: 0,
            passed: 2,
            failed: 1
        }
    );

    let ledger = pipeline.ledger();
    assert_eq!(ledger.latest("TS-001").unwrap().status, GenerationStatus::Pass);
    let cap = ledger.latest("CP-003").unwrap();
    assert_eq!(cap.status, GenerationStatus::Fail);
    assert!(cap.report.find("BANNED_WORDS").is_some());
}

#[tokio::test]
async fn test_runBatch_rerun_shouldOnlyRetryFailures() {
    let pipeline = stub_pipeline(&["miracle"]);
    let entries = catalog();
    pipeline.run_batch(&entries, &BatchOptions::default(), None).await;

    let summary = pipeline.run_batch(&entries, &BatchOptions::default(), None).await;
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(pipeline.ledger().latest("CP-003").unwrap().version, 2);
    assert_eq!(pipeline.ledger().attempts("TS-001").len(), 1);
}

#[tokio::test]
async fn test_runBatch_withFailingModel_shouldStillProduceDescriptions() {
    let window = LengthWindow::new(500, 600).unwrap();
    let mock = MockProvider::failing(FallbackTrigger::Connection);
    let generator = LlmGenerator::new(Arc::new(mock.clone()), StubGenerator::new(window, false), "test-model");
    let pipeline = GenerationPipeline::new(
        DescriptionSource::Model(generator),
        Arc::new(common::validator(500, 600, &[])),
        Arc::new(AttemptLedger::new()),
    )
    .with_concurrency(3);

    let summary = pipeline.run_batch(&catalog(), &BatchOptions::default(), None).await;
    assert_eq!(summary.passed, 3);
    assert_eq!(mock.request_count(), 3);

    for attempt in pipeline.ledger().snapshot() {
        assert_eq!(attempt.model_name, None);
        assert_eq!(
            attempt.fallback,
            Some(FallbackReason::Provider(FallbackTrigger::Connection))
        );
        assert_eq!(attempt.prompt_hash.as_ref().map(String::len), Some(64));
    }
}

#[tokio::test]
async fn test_runBatch_withWorkingModel_shouldRecordModelName() {
    let window = LengthWindow::new(500, 600).unwrap();
    let mock = MockProvider::working().with_custom_response(|_| "w".repeat(550));
    let generator = LlmGenerator::new(Arc::new(mock), StubGenerator::new(window, false), "test-model");
    let pipeline = GenerationPipeline::new(
        DescriptionSource::Model(generator),
        Arc::new(common::validator(500, 600, &[])),
        Arc::new(AttemptLedger::new()),
    );

    let options = BatchOptions {
        limit: Some(1),
        model: Some("batch-model".to_string()),
        ..Default::default()
    };
    let summary = pipeline.run_batch(&catalog(), &options, None).await;
    assert_eq!(summary.processed, 1);

    let attempt = pipeline.ledger().latest("TS-001").unwrap();
    assert_eq!(attempt.model_name.as_deref(), Some("batch-model"));
    assert_eq!(attempt.fallback, None);
    assert_eq!(attempt.char_count, 550);
}

#[tokio::test]
async fn test_snapshot_shouldExportAsJson() -> Result<()> {
    let pipeline = stub_pipeline(&[]);
    pipeline.run_batch(&catalog(), &BatchOptions::default(), None).await;

    let json = serde_json::to_value(pipeline.ledger().snapshot())?;
    let attempts = json.as_array().unwrap();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[0]["merchant_sku"], "CP-003");
    assert_eq!(attempts[0]["version"], 1);
    assert_eq!(attempts[0]["status"], "PASS");
    assert_eq!(attempts[0]["report"]["ok"], true);
    Ok(())
}
