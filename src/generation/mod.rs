/*!
 * Description generators.
 *
 * - `stub`: deterministic, model-free generator that always lands in the length window
 * - `llm`: model-backed generator that falls back to the stub on any provider failure
 * - `prompts`: prompt templates shared by the model path
 * - `markup`: the restricted markup vocabulary both generators emit
 */

pub mod llm;
pub mod markup;
pub mod prompts;
pub mod stub;

pub use llm::{FallbackReason, GenerationOutcome, LlmGenerator, STUB_MODEL_NAME};
pub use prompts::PromptBuilder;
pub use stub::StubGenerator;
