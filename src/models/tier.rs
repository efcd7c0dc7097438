use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Subscription plan level
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
pub enum SubscriptionTier {
    #[default]
    Free,
    Starter,
    Pro,
    Business,
    Enterprise,
}

impl SubscriptionTier {
    /// Lenient parse: unknown or missing tiers resolve to `Free`
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.trim().parse().ok()).unwrap_or_default()
    }
}

/// Model family, ordered by cost/quality
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelClass {
    Haiku,
    Sonnet,
    Opus,
}

impl ModelClass {
    pub fn temperature(&self) -> f32 {
        match self {
            ModelClass::Haiku => 0.3,
            ModelClass::Sonnet => 0.5,
            ModelClass::Opus => 0.6,
        }
    }
}

/// Input of the tier selector
#[derive(Debug, Clone, Default)]
pub struct TierRequest {
    pub user_tier: Option<String>,
    pub has_brand_guidelines: bool,
    pub has_promotional_signals: bool,
}

/// Resolved model for a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTier {
    pub tier_name: SubscriptionTier,
    pub model_class: ModelClass,
    pub model_id: String,
    pub temperature: f32,
}
