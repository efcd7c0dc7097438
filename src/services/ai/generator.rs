//! Tiered AI slug generation
//!
//! 一次 provider 调用，带显式超时；输出先解析为强类型再逐条校验。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::parser::{AiSuggestion, parse_suggestions, validate_suggestion};
use super::prompt::{DEFAULT_PROMPT_TEMPLATE, PromptContext, render_prompt};
use super::provider::{AiUsageRecorder, CompletionProvider, NoopUsageRecorder, ProviderError};
use crate::config::{AiConfig, SlugConfig};
use crate::models::{
    Confidence, ModelTier, PromotionalSignal, SlugCandidate, SlugComponents, SlugSource, SlugStyle,
    UserPattern, UserPreferences,
};
use crate::utils::NormalizedUrl;

/// Why an AI attempt produced nothing usable
///
/// Always recovered by the heuristic path, never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiGenerationFailure {
    Timeout,
    Provider(String),
    InvalidResponse(String),
    NoValidCandidates,
}

impl fmt::Display for AiGenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "AI call timed out"),
            Self::Provider(msg) => write!(f, "AI provider failed: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "AI response rejected: {}", msg),
            Self::NoValidCandidates => write!(f, "AI returned no valid candidate"),
        }
    }
}

impl std::error::Error for AiGenerationFailure {}

impl From<ProviderError> for AiGenerationFailure {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => Self::Timeout,
            other => Self::Provider(other.to_string()),
        }
    }
}

/// Everything one AI attempt needs
#[derive(Debug, Clone)]
pub struct AiRequest {
    pub url: NormalizedUrl,
    pub signals: Vec<PromotionalSignal>,
    pub pattern: UserPattern,
    pub preferences: UserPreferences,
    pub tier: ModelTier,
    pub style: Option<SlugStyle>,
    pub user_id: Option<String>,
}

pub struct AiSlugGenerator {
    provider: Arc<dyn CompletionProvider>,
    usage: Arc<dyn AiUsageRecorder>,
    timeout: Duration,
    max_candidates: usize,
    max_length: usize,
    template: String,
}

impl AiSlugGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, ai: &AiConfig, slug: &SlugConfig) -> Self {
        Self {
            provider,
            usage: Arc::new(NoopUsageRecorder),
            timeout: Duration::from_secs(ai.timeout_secs),
            max_candidates: ai.max_candidates.max(1),
            max_length: slug.max_length,
            template: ai
                .prompt_template
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
        }
    }

    pub fn with_usage_recorder(mut self, usage: Arc<dyn AiUsageRecorder>) -> Self {
        self.usage = usage;
        self
    }

    /// Override the call timeout (tests use milliseconds)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build_prompt(&self, request: &AiRequest) -> String {
        let ctx = PromptContext {
            url: &request.url,
            signals: &request.signals,
            pattern: &request.pattern,
            preferences: &request.preferences,
            style: request.style,
            count: self.max_candidates,
            max_length: self.max_length,
        };
        render_prompt(&self.template, &ctx)
    }

    /// Ask the tiered model for candidates, best first
    pub async fn generate(
        &self,
        request: &AiRequest,
    ) -> Result<Vec<SlugCandidate>, AiGenerationFailure> {
        let prompt = self.build_prompt(request);
        let model_id = request.tier.model_id.as_str();

        debug!(
            "AI request via {}: model={}, temperature={}, url={}",
            self.provider.name(),
            model_id,
            request.tier.temperature,
            request.url
        );

        let outcome = tokio::time::timeout(
            self.timeout,
            self.provider.complete(&prompt, model_id, request.tier.temperature),
        )
        .await;

        // quota is consumed whether or not the answer is usable
        self.usage.record(request.user_id.as_deref(), model_id).await;

        let text = match outcome {
            Err(_) => return Err(AiGenerationFailure::Timeout),
            Ok(result) => result?,
        };

        let suggestions = parse_suggestions(&text)?;
        let avoid = request.preferences.normalized_avoid_words();
        let must_include = request.preferences.normalized_must_include();

        let mut valid: Vec<AiSuggestion> = suggestions
            .into_iter()
            .filter(|s| {
                let ok = validate_suggestion(&s.slug, self.max_length, &avoid);
                if !ok {
                    debug!("Discarding AI suggestion '{}'", s.slug);
                }
                ok
            })
            .collect();
        valid.dedup_by(|a, b| a.slug == b.slug);

        if valid.is_empty() {
            warn!("AI ({}) produced no valid slug for {}", model_id, request.url);
            return Err(AiGenerationFailure::NoValidCandidates);
        }

        if !must_include.is_empty() {
            valid.sort_by_key(|s| std::cmp::Reverse(include_hits(&s.slug, &must_include)));
        }
        valid.truncate(self.max_candidates);

        Ok(valid
            .into_iter()
            .enumerate()
            .map(|(idx, s)| into_candidate(s, idx, model_id))
            .collect())
    }
}

fn include_hits(slug: &str, must_include: &[String]) -> usize {
    let lower = slug.to_lowercase();
    must_include
        .iter()
        .filter(|w| lower.contains(w.as_str()))
        .count()
}

fn into_candidate(suggestion: AiSuggestion, idx: usize, model_id: &str) -> SlugCandidate {
    let confidence = if idx == 0 {
        Confidence::High
    } else {
        Confidence::Medium
    };
    let components = suggestion
        .components
        .unwrap_or_else(|| components_from_slug(&suggestion.slug));
    let mut candidate =
        SlugCandidate::new(suggestion.slug, SlugSource::Ai, confidence).with_components(components);
    candidate.ai_model = Some(model_id.to_string());
    candidate.style = suggestion.style;
    candidate.reasoning = suggestion.reasoning;
    candidate
}

/// Merchant.Subject.Descriptor read positionally
fn components_from_slug(slug: &str) -> SlugComponents {
    let mut parts = slug.split('.');
    SlugComponents {
        merchant: parts.next().map(str::to_string),
        subject: parts.next().map(str::to_string),
        descriptor: parts.next().map(str::to_string),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelClass, SubscriptionTier};
    use crate::utils::normalize_url;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
        fn name(&self) -> &'static str {
            "canned"
        }
    }

    struct Slow;

    #[async_trait]
    impl CompletionProvider for Slow {
        async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("[]".into())
        }
        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        models: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AiUsageRecorder for Counting {
        async fn record(&self, _: Option<&str>, model_id: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.models.lock().unwrap().push(model_id.to_string());
        }
    }

    fn request(preferences: UserPreferences) -> AiRequest {
        AiRequest {
            url: normalize_url("https://www.nike.com/t/air-max-90").unwrap(),
            signals: Vec::new(),
            pattern: UserPattern::default(),
            preferences,
            tier: ModelTier {
                tier_name: SubscriptionTier::Free,
                model_class: ModelClass::Haiku,
                model_id: "haiku-test".into(),
                temperature: 0.3,
            },
            style: None,
            user_id: Some("u1".into()),
        }
    }

    fn generator(provider: Arc<dyn CompletionProvider>) -> AiSlugGenerator {
        AiSlugGenerator::new(provider, &AiConfig::default(), &SlugConfig::default())
    }

    #[tokio::test]
    async fn test_valid_candidates_ranked() {
        let provider = Arc::new(Canned(
            r#"[{"slug":"Nike.AirMax"},{"slug":"bad slug"},{"slug":"Nike.AirMax90.Sale"}]"#,
        ));
        let out = generator(provider)
            .generate(&request(UserPreferences::default()))
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].slug, "Nike.AirMax");
        assert_eq!(out[0].confidence, Confidence::High);
        assert_eq!(out[1].confidence, Confidence::Medium);
        assert!(out.iter().all(|c| c.source == SlugSource::Ai));
        assert_eq!(out[0].ai_model.as_deref(), Some("haiku-test"));
        assert_eq!(out[0].components.merchant.as_deref(), Some("Nike"));
    }

    #[tokio::test]
    async fn test_must_include_moves_forward_and_avoid_filters() {
        let provider = Arc::new(Canned(
            r#"{"slugs":[{"slug":"Nike.Cheap.Shoes"},{"slug":"Nike.Runner"},{"slug":"Nike.AirMax.Sale"}]}"#,
        ));
        let mut prefs = UserPreferences::default();
        prefs.avoid_words.insert("cheap".into());
        prefs.must_include.insert("Sale".into());
        let out = generator(provider).generate(&request(prefs)).await.unwrap();
        let slugs: Vec<_> = out.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["Nike.AirMax.Sale", "Nike.Runner"]);
    }

    #[tokio::test]
    async fn test_no_valid_candidates() {
        let provider = Arc::new(Canned(r#"[{"slug":"nike-air"}]"#));
        let err = generator(provider)
            .generate(&request(UserPreferences::default()))
            .await
            .unwrap_err();
        assert_eq!(err, AiGenerationFailure::NoValidCandidates);
    }

    #[tokio::test]
    async fn test_lowercase_answer_is_not_repaired() {
        let provider = Arc::new(Canned(r#"[{"slug":"nike.airmax"},{"slug":"Nike.Runner"}]"#));
        let out = generator(provider)
            .generate(&request(UserPreferences::default()))
            .await
            .unwrap();
        let slugs: Vec<_> = out.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["Nike.Runner"]);
        assert_eq!(out[0].confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_timeout_still_records_usage() {
        let usage = Arc::new(Counting::default());
        let generator = generator(Arc::new(Slow))
            .with_timeout(Duration::from_millis(20))
            .with_usage_recorder(usage.clone());
        let err = generator
            .generate(&request(UserPreferences::default()))
            .await
            .unwrap_err();
        assert_eq!(err, AiGenerationFailure::Timeout);
        assert_eq!(usage.calls.load(Ordering::SeqCst), 1);
        assert_eq!(usage.models.lock().unwrap().as_slice(), ["haiku-test"]);
    }

    #[test]
    fn test_custom_template() {
        let mut ai = AiConfig::default();
        ai.prompt_template = Some("slug for {url} x{count}".into());
        let generator = AiSlugGenerator::new(Arc::new(Canned("[]")), &ai, &SlugConfig::default());
        assert_eq!(
            generator.build_prompt(&request(UserPreferences::default())),
            "slug for nike.com/t/air-max-90 x3"
        );
    }
}
