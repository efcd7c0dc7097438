//! AI slug generation
//!
//! - `provider`: completion + usage collaborator traits
//! - `anthropic`: HTTP provider for the Anthropic Messages API
//! - `prompt`: prompt template rendering
//! - `parser`: typed parsing and validation of model output
//! - `generator`: one tiered call per request, bounded by a timeout

mod anthropic;
mod generator;
mod parser;
mod prompt;
mod provider;

pub use anthropic::AnthropicProvider;
pub use generator::{AiGenerationFailure, AiRequest, AiSlugGenerator};
pub use parser::{AiSuggestion, parse_suggestions, validate_suggestion};
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, PromptContext, render_prompt};
pub use provider::{AiUsageRecorder, CompletionProvider, NoopUsageRecorder, ProviderError};
