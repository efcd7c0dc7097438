use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Where a candidate came from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlugSource {
    Ai,
    Regex,
    Cache,
}

/// Confidence reported with a candidate
///
/// `Regex` + `Low` is the hint for callers to offer a manual edit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Requested slug style, part of the cache key
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SlugStyle {
    #[default]
    Descriptive,
    Short,
    Branded,
    Promotional,
}

impl SlugStyle {
    /// One-line instruction embedded in the AI prompt
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            SlugStyle::Descriptive => "descriptive: name the product or topic clearly",
            SlugStyle::Short => "short: two or three segments at most",
            SlugStyle::Branded => "branded: lead with the merchant or brand",
            SlugStyle::Promotional => "promotional: surface the offer or call to action",
        }
    }
}

/// Optional semantic tags attached to a candidate
///
/// AI candidates use merchant/subject/descriptor, heuristic ones
/// merchant/brand/product/modifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

/// A proposed slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugCandidate {
    pub slug: String,
    pub source: SlugSource,
    pub confidence: Confidence,
    #[serde(default)]
    pub components: SlugComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl SlugCandidate {
    pub fn new(slug: impl Into<String>, source: SlugSource, confidence: Confidence) -> Self {
        Self {
            slug: slug.into(),
            source,
            confidence,
            components: SlugComponents::default(),
            ai_model: None,
            style: None,
            reasoning: None,
        }
    }

    pub fn with_components(mut self, components: SlugComponents) -> Self {
        self.components = components;
        self
    }

    /// Same candidate as served to a caller that did not trigger generation
    pub fn as_cached(&self) -> Self {
        Self {
            source: SlugSource::Cache,
            ..self.clone()
        }
    }

    /// Dot-separated segments of the slug
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.slug.split('.')
    }

    /// Equality ignoring the `source` tag
    pub fn same_proposal(&self, other: &SlugCandidate) -> bool {
        self.slug == other.slug
            && self.confidence == other.confidence
            && self.components == other.components
            && self.ai_model == other.ai_model
    }
}
