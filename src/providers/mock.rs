/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, optionally with scripted replies
 * - `MockProvider::failing(trigger)` - Always fails with the given error class
 * - `MockProvider::fail_after(n, trigger)` - Succeeds `n` times, then fails
 * - `MockProvider::empty()` - Succeeds with an empty body
 * - `MockProvider::slow(ms)` - Sleeps before answering
 *
 * Clones share the request counter and the prompt log, so a test can keep a
 * handle while the generator owns another.
 */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{FallbackTrigger, ProviderError};
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Text returned by a working mock with no script or custom generator
pub const DEFAULT_MOCK_TEXT: &str = "<strong>Mock description</strong><br/>Generated by the mock provider.";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error of the given class
    Failing(FallbackTrigger),
    /// Succeeds for the first `successes` requests, then fails
    FailAfter {
        successes: usize,
        trigger: FallbackTrigger,
    },
    /// Returns an empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing generation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Prompts seen, in order
    prompts: Arc<Mutex<Vec<String>>>,
    /// Replies consumed front to back by successful requests
    script: Arc<Mutex<VecDeque<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&CompletionRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(trigger: FallbackTrigger) -> Self {
        Self::new(MockBehavior::Failing(trigger))
    }

    /// Create a mock that fails once `successes` requests have been served
    pub fn fail_after(successes: usize, trigger: FallbackTrigger) -> Self {
        Self::new(MockBehavior::FailAfter { successes, trigger })
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Queue replies for successive successful requests
    pub fn with_responses<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.lock().extend(replies.into_iter().map(Into::into));
        self
    }

    /// Set a custom response generator, used once the script is exhausted
    pub fn with_custom_response(mut self, generator: fn(&CompletionRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn reply(&self, request: &CompletionRequest) -> CompletionResponse {
        let text = match self.script.lock().pop_front() {
            Some(text) => text,
            None => match self.custom_response {
                Some(generator) => generator(request),
                None => DEFAULT_MOCK_TEXT.to_string(),
            },
        };
        CompletionResponse {
            input_tokens: Some(request.prompt.len() as u64),
            output_tokens: Some(text.len() as u64),
            text,
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            prompts: Arc::clone(&self.prompts),
            script: Arc::clone(&self.script),
            custom_response: self.custom_response,
        }
    }
}

/// A representative error for each fallback class
pub fn simulated_error(trigger: FallbackTrigger) -> ProviderError {
    let message = format!("Simulated {} failure", trigger);
    match trigger {
        FallbackTrigger::Auth => ProviderError::AuthenticationError(message),
        FallbackTrigger::RateLimit => ProviderError::RateLimitExceeded(message),
        FallbackTrigger::Timeout => ProviderError::Timeout(message),
        FallbackTrigger::Connection => ProviderError::ConnectionError(message),
        FallbackTrigger::BadRequest => ProviderError::BadRequest(message),
        FallbackTrigger::Other => ProviderError::ApiError {
            status_code: 500,
            message,
        },
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(request.prompt.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.reply(&request)),

            MockBehavior::Failing(trigger) => Err(simulated_error(trigger)),

            MockBehavior::FailAfter { successes, trigger } => {
                if count < successes {
                    Ok(self.reply(&request))
                } else {
                    Err(simulated_error(trigger))
                }
            }

            MockBehavior::Empty => Ok(CompletionResponse {
                text: String::new(),
                input_tokens: Some(0),
                output_tokens: Some(0),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.reply(&request))
            }
        }
    }
}
