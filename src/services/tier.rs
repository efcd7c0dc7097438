//! Subscription tier → model lookup

use crate::config::ModelsConfig;
use crate::models::{ModelClass, ModelTier, SubscriptionTier, TierRequest};

/// Model ids per class, taken from `[ai.models]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    haiku: String,
    sonnet: String,
    opus: String,
}

impl ModelCatalog {
    pub fn new(models: &ModelsConfig) -> Self {
        Self {
            haiku: models.haiku.clone(),
            sonnet: models.sonnet.clone(),
            opus: models.opus.clone(),
        }
    }

    pub fn model_id(&self, class: ModelClass) -> &str {
        match class {
            ModelClass::Haiku => &self.haiku,
            ModelClass::Sonnet => &self.sonnet,
            ModelClass::Opus => &self.opus,
        }
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new(&ModelsConfig::default())
    }
}

/// Model family for a tier
///
/// Escalation to the top model happens only at enterprise.
pub fn model_class_for(tier: SubscriptionTier) -> ModelClass {
    match tier {
        SubscriptionTier::Free | SubscriptionTier::Starter => ModelClass::Haiku,
        SubscriptionTier::Pro | SubscriptionTier::Business => ModelClass::Sonnet,
        SubscriptionTier::Enterprise => ModelClass::Opus,
    }
}

/// Resolve the model and temperature for a request
///
/// Pure lookup with no error path. The brand-guideline and promotional flags
/// are accepted for forward compatibility but do not change the outcome.
pub fn select_model(catalog: &ModelCatalog, request: &TierRequest) -> ModelTier {
    let tier_name = SubscriptionTier::from_name(request.user_tier.as_deref());
    let model_class = model_class_for(tier_name);
    ModelTier {
        tier_name,
        model_class,
        model_id: catalog.model_id(model_class).to_string(),
        temperature: model_class.temperature(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tier: Option<&str>) -> TierRequest {
        TierRequest {
            user_tier: tier.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_table() {
        let catalog = ModelCatalog::default();
        assert_eq!(select_model(&catalog, &request(Some("free"))).model_class, ModelClass::Haiku);
        assert_eq!(select_model(&catalog, &request(Some("pro"))).model_class, ModelClass::Sonnet);
        let enterprise = select_model(&catalog, &request(Some("Enterprise")));
        assert_eq!(enterprise.model_class, ModelClass::Opus);
        assert_eq!(enterprise.temperature, 0.6);
        assert_eq!(enterprise.model_id, catalog.model_id(ModelClass::Opus));
    }

    #[test]
    fn test_unknown_and_missing_default_to_haiku() {
        let catalog = ModelCatalog::default();
        assert_eq!(select_model(&catalog, &request(None)).model_class, ModelClass::Haiku);
        assert_eq!(
            select_model(&catalog, &request(Some("platinum"))).model_class,
            ModelClass::Haiku
        );
        assert_eq!(select_model(&catalog, &request(None)).temperature, 0.3);
    }
}
