/*!
 * Catalog records and generation attempts.
 *
 * These structures describe what the catalog store hands to the generators
 * and what the persistence layer receives back: one attempt per generation,
 * numbered per product.
 */

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::generation::FallbackReason;
use crate::validation::ValidationReport;

/// Product data consumed by the generators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title
    pub title: String,
    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Category path, e.g. "Clothing/Tops"
    #[serde(default)]
    pub category_path: Option<String>,
    /// Existing description, reproduced verbatim
    #[serde(default)]
    pub old_description: Option<String>,
    /// Image URLs in display order
    #[serde(default, deserialize_with = "deserialize_image_urls")]
    pub image_urls: Vec<String>,
}

impl ProductRecord {
    /// Create a record with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category_path: impl Into<String>) -> Self {
        self.category_path = Some(category_path.into());
        self
    }

    pub fn with_old_description(mut self, old_description: impl Into<String>) -> Self {
        self.old_description = Some(old_description.into());
        self
    }

    pub fn with_image_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Non-blank brand
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.brand.as_deref())
    }

    /// Non-blank category path
    pub fn category_path(&self) -> Option<&str> {
        non_blank(self.category_path.as_deref())
    }

    /// The old description, untouched, when it has any content
    pub fn old_description(&self) -> Option<&str> {
        self.old_description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Catalog row keyed by the merchant SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Merchant-assigned unique SKU
    pub merchant_sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(flatten)]
    pub product: ProductRecord,
}

impl CatalogEntry {
    pub fn new(merchant_sku: impl Into<String>, product: ProductRecord) -> Self {
        Self {
            merchant_sku: merchant_sku.into(),
            barcode: None,
            source_url: None,
            product,
        }
    }
}

/// Normalize a serialized image-URL field into an ordered list.
///
/// Recognized forms, checked in this order:
/// 1. JSON array (`["u1", "u2"]`)
/// 2. pipe-delimited (`u1|u2`)
/// 3. comma-delimited (`u1,u2`)
/// 4. a single bare http(s) URL
///
/// Anything else, including blank input, yields an empty list. Blank items
/// and exact duplicates are dropped.
pub fn parse_image_urls(raw: Option<&str>) -> Vec<String> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    if raw.starts_with('[') {
        if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(raw) {
            return dedup_urls(items.into_iter().map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }));
        }
    }

    for delimiter in ['|', ','] {
        if raw.contains(delimiter) {
            return dedup_urls(raw.split(delimiter).map(str::to_string));
        }
    }

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => vec![raw.to_string()],
        _ => Vec::new(),
    }
}

fn dedup_urls<I: IntoIterator<Item = String>>(urls: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for url in urls {
        let url = url.trim();
        if url.is_empty() || out.iter().any(|seen| seen == url) {
            continue;
        }
        out.push(url.to_string());
    }
    out
}

fn deserialize_image_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawImageUrls {
        List(Vec<String>),
        Serialized(String),
    }

    Ok(match Option::<RawImageUrls>::deserialize(deserializer)? {
        Some(RawImageUrls::List(urls)) => dedup_urls(urls),
        Some(RawImageUrls::Serialized(raw)) => parse_image_urls(Some(&raw)),
        None => Vec::new(),
    })
}

/// Persisted verdict of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GenerationStatus {
    /// Validation passed
    Pass,
    /// Validation reported at least one error
    Fail,
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStatus::Pass => write!(f, "PASS"),
            GenerationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

impl std::str::FromStr for GenerationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PASS" => Ok(GenerationStatus::Pass),
            "FAIL" => Ok(GenerationStatus::Fail),
            _ => Err(anyhow::anyhow!("Invalid generation status: {}", s)),
        }
    }
}

impl From<&ValidationReport> for GenerationStatus {
    fn from(report: &ValidationReport) -> Self {
        if report.ok {
            GenerationStatus::Pass
        } else {
            GenerationStatus::Fail
        }
    }
}

/// One persisted (markup, report) pair for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationAttempt {
    /// Product this attempt belongs to
    pub merchant_sku: String,
    /// Per-product version, starting at 1; assigned when recorded
    pub version: u32,
    /// PASS/FAIL mirror of `report.ok`
    pub status: GenerationStatus,
    /// Model that produced the markup, `None` for stub output
    pub model_name: Option<String>,
    /// SHA-256 of the initial prompt
    pub prompt_hash: Option<String>,
    /// Why the stub generator was used, if it was
    pub fallback: Option<FallbackReason>,
    /// Raw markup length
    pub char_count: usize,
    /// Generated markup
    pub markup: String,
    /// Validation report
    pub report: ValidationReport,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl GenerationAttempt {
    /// Create an unrecorded attempt (version 0)
    pub fn new(merchant_sku: impl Into<String>, markup: String, report: ValidationReport) -> Self {
        Self {
            merchant_sku: merchant_sku.into(),
            version: 0,
            status: GenerationStatus::from(&report),
            model_name: None,
            prompt_hash: None,
            fallback: None,
            char_count: report.char_count,
            markup,
            report,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// In-memory attempt history keyed by SKU.
///
/// Version assignment and insertion happen under one lock, so parallel
/// workers recording the same SKU still get distinct, increasing versions.
#[derive(Debug, Default)]
pub struct AttemptLedger {
    attempts: Mutex<HashMap<String, Vec<GenerationAttempt>>>,
}

impl AttemptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an attempt under the next version for its SKU and return that version
    pub fn record(&self, mut attempt: GenerationAttempt) -> u32 {
        let mut attempts = self.attempts.lock();
        let history = attempts.entry(attempt.merchant_sku.clone()).or_default();
        let version = history.last().map(|a| a.version).unwrap_or(0) + 1;
        attempt.version = version;
        history.push(attempt);
        version
    }

    /// Version the next recorded attempt for `sku` would get
    pub fn next_version(&self, sku: &str) -> u32 {
        self.attempts
            .lock()
            .get(sku)
            .and_then(|history| history.last())
            .map(|a| a.version)
            .unwrap_or(0)
            + 1
    }

    /// Whether any attempt for `sku` passed validation
    pub fn has_pass(&self, sku: &str) -> bool {
        self.attempts
            .lock()
            .get(sku)
            .is_some_and(|history| history.iter().any(|a| a.status == GenerationStatus::Pass))
    }

    /// Most recent attempt for `sku`
    pub fn latest(&self, sku: &str) -> Option<GenerationAttempt> {
        self.attempts
            .lock()
            .get(sku)
            .and_then(|history| history.last().cloned())
    }

    /// All attempts for `sku`, oldest first
    pub fn attempts(&self, sku: &str) -> Vec<GenerationAttempt> {
        self.attempts.lock().get(sku).cloned().unwrap_or_default()
    }

    /// Every attempt, ordered by SKU then version
    pub fn snapshot(&self) -> Vec<GenerationAttempt> {
        let attempts = self.attempts.lock();
        let mut skus: Vec<&String> = attempts.keys().collect();
        skus.sort();
        skus.into_iter()
            .flat_map(|sku| attempts[sku].iter().cloned())
            .collect()
    }
}
