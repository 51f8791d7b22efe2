/*!
 * Batch generation pipeline.
 *
 * For each catalog entry: generate markup, validate it, and record the
 * attempt in the ledger under the next per-SKU version. Entries that already
 * have a passing attempt are skipped unless forced.
 */

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{AttemptLedger, CatalogEntry, GenerationAttempt, GenerationStatus};
use crate::generation::{GenerationOutcome, LlmGenerator, StubGenerator, STUB_MODEL_NAME};
use crate::validation::Validator;

/// Where descriptions come from
#[derive(Debug, Clone)]
pub enum DescriptionSource {
    /// Model first, stub on failure
    Model(LlmGenerator),
    /// Stub only, no external calls
    Stub(StubGenerator),
}

impl DescriptionSource {
    /// Produce markup for one product
    pub async fn produce(&self, entry: &CatalogEntry, model: Option<&str>) -> GenerationOutcome {
        match self {
            DescriptionSource::Model(generator) => generator.generate_detailed(&entry.product, model).await,
            DescriptionSource::Stub(generator) => GenerationOutcome {
                markup: generator.generate(&entry.product),
                model_name: STUB_MODEL_NAME.to_string(),
                prompt_hash: String::new(),
                fallback: None,
            },
        }
    }
}

/// Options for one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Only consider the first `limit` entries
    pub limit: Option<usize>,
    /// Regenerate entries that already passed
    pub force: bool,
    /// Model override for this run
    pub model: Option<String>,
}

/// Counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Generate, validate and record descriptions
#[derive(Debug)]
pub struct GenerationPipeline {
    source: DescriptionSource,
    validator: Arc<Validator>,
    ledger: Arc<AttemptLedger>,
    concurrency: usize,
}

impl GenerationPipeline {
    pub fn new(source: DescriptionSource, validator: Arc<Validator>, ledger: Arc<AttemptLedger>) -> Self {
        Self {
            source,
            validator,
            ledger,
            concurrency: 1,
        }
    }

    /// Products processed in parallel; at least one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn ledger(&self) -> &Arc<AttemptLedger> {
        &self.ledger
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Generate, validate and record one entry, returning the recorded attempt
    pub async fn run_product(&self, entry: &CatalogEntry, model: Option<&str>) -> GenerationAttempt {
        let outcome = self.source.produce(entry, model).await;
        let report = self.validator.validate(&outcome.markup);

        if !report.ok {
            for error in &report.errors {
                debug!("{}: {}", entry.merchant_sku, error);
            }
        }

        let mut attempt = GenerationAttempt::new(&entry.merchant_sku, outcome.markup, report);
        if outcome.fallback.is_none() && outcome.model_name != STUB_MODEL_NAME {
            attempt.model_name = Some(outcome.model_name);
        }
        if !outcome.prompt_hash.is_empty() {
            attempt.prompt_hash = Some(outcome.prompt_hash);
        }
        attempt.fallback = outcome.fallback;

        attempt.version = self.ledger.record(attempt.clone());
        info!(
            "{} v{}: {} ({} chars)",
            attempt.merchant_sku, attempt.version, attempt.status, attempt.char_count
        );
        attempt
    }

    /// Process a catalog, skipping entries that already passed unless forced
    pub async fn run_batch(
        &self,
        entries: &[CatalogEntry],
        options: &BatchOptions,
        progress: Option<&ProgressBar>,
    ) -> BatchSummary {
        let limit = options.limit.unwrap_or(entries.len()).min(entries.len());
        let (pending, skipped): (Vec<&CatalogEntry>, Vec<&CatalogEntry>) = entries[..limit]
            .iter()
            .partition(|entry| options.force || !self.ledger.has_pass(&entry.merchant_sku));

        for entry in &skipped {
            debug!("Skipping {}: already has a passing attempt", entry.merchant_sku);
        }
        if let Some(pb) = progress {
            pb.set_length(pending.len() as u64);
        }

        let model = options.model.as_deref();
        let statuses: Vec<GenerationStatus> = stream::iter(pending)
            .map(move |entry| async move {
                let attempt = self.run_product(entry, model).await;
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                attempt.status
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let passed = statuses.iter().filter(|s| **s == GenerationStatus::Pass).count();
        let summary = BatchSummary {
            processed: statuses.len(),
            skipped: skipped.len(),
            passed,
            failed: statuses.len() - passed,
        };

        if summary.failed > 0 {
            warn!("{} of {} descriptions failed validation", summary.failed, summary.processed);
        }
        summary
    }
}
