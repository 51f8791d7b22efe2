/*!
 * Provider implementations for text generation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - OpenAI: Responses API integration
 * - Anthropic: Messages API integration
 * - Mock: scripted provider for tests
 *
 * Every client maps its failures onto `ProviderError`, so callers only ever
 * deal with one error taxonomy.
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;

use crate::app_config::{GenerationConfig, ModelProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod openai;

/// Base delay for exponential backoff between retries
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// A single text completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Full user prompt
    pub prompt: String,
    /// Output token budget
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_output_tokens,
        }
    }
}

/// Text returned by a provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Generated text, possibly empty
    pub text: String,
    /// Prompt tokens, when reported
    pub input_tokens: Option<u64>,
    /// Completion tokens, when reported
    pub output_tokens: Option<u64>,
}

impl CompletionResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably behind an `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

/// Run `operation`, retrying retryable failures with exponential backoff.
///
/// At most `max_retries + 1` attempts are made. Non-retryable errors are
/// returned immediately.
pub async fn with_retries<T, F, Fut>(
    label: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!(
                    "{} request failed: {} - attempt {}/{}",
                    label,
                    e,
                    attempt,
                    max_retries + 1
                );
                let backoff_ms = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Build the configured provider client
pub fn build_provider(config: &GenerationConfig) -> Arc<dyn Provider> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        ModelProvider::OpenAI => Arc::new(
            openai::OpenAI::new(&config.api_key, config.get_endpoint(), timeout)
                .with_max_retries(config.max_retries),
        ),
        ModelProvider::Anthropic => Arc::new(
            anthropic::Anthropic::new(&config.api_key, config.get_endpoint(), timeout)
                .with_max_retries(config.max_retries),
        ),
    }
}
