/*!
 * # seogen - SEO product description generation and validation
 *
 * A Rust library that produces marketplace product descriptions and checks
 * them against a content policy.
 *
 * ## Features
 *
 * - Validate markup against banned words, a length window and sentence repetition
 * - Deterministic, model-free stub generation that always fits the length window
 * - Model-backed generation with automatic fallback to the stub:
 *   - OpenAI Responses API
 *   - Anthropic Messages API
 * - Versioned PASS/FAIL attempt history per product
 * - Concurrent batch processing of a catalog
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `validation`: Normalization, segmentation and the content checks
 * - `generation`: Stub and model-backed generators, prompts and markup helpers
 * - `providers`: Client implementations for LLM providers
 * - `catalog`: Product records, image URL parsing and attempt history
 * - `pipeline`: Generate, validate and record over a catalog
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod catalog;
pub mod errors;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use catalog::{AttemptLedger, CatalogEntry, GenerationAttempt, GenerationStatus, ProductRecord};
pub use errors::{AppError, ContentError, FallbackTrigger, ProviderError};
pub use generation::{FallbackReason, GenerationOutcome, LlmGenerator, StubGenerator};
pub use pipeline::{BatchOptions, BatchSummary, DescriptionSource, GenerationPipeline};
pub use validation::{ErrorEntry, ValidationReport, Validator};
