//! Typed parsing of model output
//!
//! Output is trusted only after it deserializes into [`AiSuggestion`]s and
//! each slug passes validation; nothing is repaired.

use serde::Deserialize;

use super::generator::AiGenerationFailure;
use crate::models::SlugComponents;
use crate::utils::{contains_avoided, is_valid_slug};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiSuggestion {
    pub slug: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub components: Option<SlugComponents>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AiResponse {
    List(Vec<AiSuggestion>),
    Wrapped {
        #[serde(alias = "suggestions", alias = "candidates")]
        slugs: Vec<AiSuggestion>,
    },
}

impl AiResponse {
    fn into_suggestions(self) -> Vec<AiSuggestion> {
        match self {
            AiResponse::List(items) => items,
            AiResponse::Wrapped { slugs } => slugs,
        }
    }
}

/// Parse a completion into suggestions
///
/// Accepts a bare array, a `{"slugs": [...]}` wrapper, and either of them
/// inside a markdown fence or surrounded by chatter.
pub fn parse_suggestions(text: &str) -> Result<Vec<AiSuggestion>, AiGenerationFailure> {
    let body = strip_fence(text.trim());
    if body.is_empty() {
        return Err(AiGenerationFailure::InvalidResponse("empty response".into()));
    }

    let parsed = serde_json::from_str::<AiResponse>(body)
        .ok()
        .or_else(|| slice_between(body, '[', ']').and_then(|s| serde_json::from_str(s).ok()))
        .or_else(|| slice_between(body, '{', '}').and_then(|s| serde_json::from_str(s).ok()))
        .ok_or_else(|| {
            AiGenerationFailure::InvalidResponse(format!(
                "not a JSON suggestion list: {}",
                preview(body)
            ))
        })?;

    let suggestions = parsed.into_suggestions();
    if suggestions.is_empty() {
        return Err(AiGenerationFailure::InvalidResponse("empty suggestion list".into()));
    }
    Ok(suggestions)
}

/// Grammar, PascalCase, length budget and avoid-word check for one suggestion
pub fn validate_suggestion(slug: &str, max_length: usize, avoid_words: &[String]) -> bool {
    is_valid_slug(slug, max_length)
        && slug.split('.').all(starts_pascal)
        && !contains_avoided(slug, avoid_words)
}

fn starts_pascal(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string line (```json)
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().trim_end_matches("```").trim()
}

fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}
