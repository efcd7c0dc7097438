use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Capitalization {
    #[default]
    PascalCase,
    Lowercase,
    Mixed,
}

/// Structural profile learned from a user's recent slugs
///
/// Derived only; consumed as a soft bias by the AI prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPattern {
    pub structure: Option<String>,
    pub avg_word_count: f64,
    pub separator: char,
    pub capitalization: Capitalization,
    pub includes_brand: bool,
    pub includes_year: bool,
    pub uses_cta: bool,
    pub confidence: f64,
    pub sample_size: usize,
}

impl Default for UserPattern {
    fn default() -> Self {
        Self {
            structure: None,
            avg_word_count: 0.0,
            separator: '.',
            capitalization: Capitalization::PascalCase,
            includes_brand: false,
            includes_year: false,
            uses_cta: false,
            confidence: 0.0,
            sample_size: 0,
        }
    }
}

impl UserPattern {
    /// Whether the pattern carries enough evidence to be shown to the model
    pub fn is_informative(&self) -> bool {
        self.confidence > 0.0 && self.structure.is_some()
    }
}

/// Caller-supplied naming constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub brand_voice: Option<String>,
    #[serde(default)]
    pub preferred_style: Option<String>,
    #[serde(default)]
    pub preferred_length: Option<usize>,
    /// Hard exclusion, matched case-insensitively as substrings
    #[serde(default)]
    pub avoid_words: BTreeSet<String>,
    /// Best-effort inclusion
    #[serde(default)]
    pub must_include: BTreeSet<String>,
}

impl UserPreferences {
    /// Lower-cased, non-empty avoid words
    pub fn normalized_avoid_words(&self) -> Vec<String> {
        normalize_words(&self.avoid_words)
    }

    pub fn normalized_must_include(&self) -> Vec<String> {
        normalize_words(&self.must_include)
    }
}

fn normalize_words(words: &BTreeSet<String>) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Per-call snapshot handed in by the user-profile collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Most recent first
    #[serde(default)]
    pub historical_slugs: Vec<String>,
    #[serde(default)]
    pub has_brand_guidelines: bool,
}
