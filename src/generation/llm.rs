/*!
 * Model-backed description generator.
 *
 * Every provider failure ends in the stub generator's output for the same
 * product, so callers always receive markup. The outcome records whether a
 * fallback happened and why.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::prompts::PromptBuilder;
use super::stub::StubGenerator;
use crate::app_config::Config;
use crate::catalog::ProductRecord;
use crate::errors::{ContentError, FallbackTrigger, ProviderError};
use crate::providers::{CompletionRequest, Provider};
use crate::validation::normalize::markup_len;

/// Model name recorded for stub output
pub const STUB_MODEL_NAME: &str = "stub";

/// Default output token budget per completion
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 16_000;

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static LINE_BREAK_VARIANTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TRAILING_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Why the stub output was used instead of model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "trigger")]
pub enum FallbackReason {
    /// A provider call failed
    Provider(FallbackTrigger),
    /// The first completion was empty
    EmptyResponse,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Provider(trigger) => write!(f, "provider error ({})", trigger),
            FallbackReason::EmptyResponse => write!(f, "empty response"),
        }
    }
}

/// Markup plus provenance for one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub markup: String,
    /// Model that produced the markup, or `stub`
    pub model_name: String,
    /// SHA-256 of the initial prompt, hex encoded
    pub prompt_hash: String,
    pub fallback: Option<FallbackReason>,
}

/// Generator that asks a model first and falls back to the stub
#[derive(Debug, Clone)]
pub struct LlmGenerator {
    provider: Arc<dyn Provider>,
    stub: StubGenerator,
    prompts: PromptBuilder,
    default_model: String,
    timeout: Duration,
    max_output_tokens: u32,
}

impl LlmGenerator {
    /// Create a generator sharing the stub's window and image mode
    pub fn new(provider: Arc<dyn Provider>, stub: StubGenerator, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            prompts: PromptBuilder::new(stub.window(), stub.inline_images()),
            stub,
            default_model: default_model.into(),
            timeout: DEFAULT_TIMEOUT,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Set the deadline for each provider call, retries included
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Build from configuration around an already constructed provider
    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Result<Self, ContentError> {
        let generation = &config.generation;
        // Each attempt gets the client timeout; one extra second covers backoff
        let budget = generation
            .timeout_secs
            .saturating_mul(u64::from(generation.max_retries) + 1)
            .saturating_add(1);

        Ok(Self::new(
            provider,
            StubGenerator::from_config(&config.content)?,
            generation.get_model(),
        )
        .with_timeout(Duration::from_secs(budget))
        .with_max_output_tokens(generation.max_output_tokens))
    }

    pub fn stub(&self) -> &StubGenerator {
        &self.stub
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Generate markup for `product`, never failing
    pub async fn generate(&self, product: &ProductRecord, model: Option<&str>) -> String {
        self.generate_detailed(product, model).await.markup
    }

    /// Generate markup and report how it was produced
    pub async fn generate_detailed(&self, product: &ProductRecord, model: Option<&str>) -> GenerationOutcome {
        let model = model.unwrap_or(&self.default_model).to_string();
        let prompt = self.prompts.initial(product);
        let prompt_hash = prompt_fingerprint(&prompt);

        let first = match self.request(&model, prompt).await {
            Ok(text) => normalize_model_output(&text),
            Err(e) => {
                warn!("{} failed for '{}', using stub: {}", self.provider.name(), product.title, e);
                return self.fallback(product, prompt_hash, FallbackReason::Provider(e.fallback_trigger()));
            }
        };

        if first.is_empty() {
            warn!("{} returned no text for '{}', using stub", self.provider.name(), product.title);
            return self.fallback(product, prompt_hash, FallbackReason::EmptyResponse);
        }

        let window = self.stub.window();
        let mut markup = first;
        let len = markup_len(&markup);
        if len < window.min_chars {
            let deficit = window.deficit(len);
            debug!("Draft for '{}' is {} chars short, requesting extension", product.title, deficit);
            match self.request(&model, self.prompts.extension(&markup, deficit)).await {
                Ok(text) => {
                    let extended = normalize_model_output(&text);
                    if !extended.is_empty() {
                        markup = extended;
                    }
                }
                Err(e) => {
                    warn!("Extension request failed for '{}', using stub: {}", product.title, e);
                    return self.fallback(product, prompt_hash, FallbackReason::Provider(e.fallback_trigger()));
                }
            }
        }

        info!("Generated {} chars for '{}' with {}", markup_len(&markup), product.title, model);
        GenerationOutcome {
            markup: window.truncate(markup),
            model_name: model,
            prompt_hash,
            fallback: None,
        }
    }

    async fn request(&self, model: &str, prompt: String) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(model, prompt, self.max_output_tokens);
        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(result) => result.map(|response| response.text),
            Err(_) => Err(ProviderError::Timeout(format!(
                "no response within {:?}",
                self.timeout
            ))),
        }
    }

    fn fallback(&self, product: &ProductRecord, prompt_hash: String, reason: FallbackReason) -> GenerationOutcome {
        GenerationOutcome {
            markup: self.stub.generate(product),
            model_name: STUB_MODEL_NAME.to_string(),
            prompt_hash,
            fallback: Some(reason),
        }
    }
}

/// Canonicalize line breaks and blank lines in model output
pub fn normalize_model_output(text: &str) -> String {
    let text = LINE_BREAK_VARIANTS.replace_all(text, "<br/>");
    let text = text.replace("\r\n", "\n");
    let text = TRAILING_SPACES.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Hex SHA-256 of a prompt
pub fn prompt_fingerprint(prompt: &str) -> String {
    format!("{:x}", Sha256::digest(prompt.as_bytes()))
}
