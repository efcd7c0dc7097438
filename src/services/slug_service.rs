//! Slug generation engine
//!
//! Sequences normalization, the single-flight cache, the AI path and the
//! heuristic fallback. Collision resolution is a separate step the caller
//! runs against its own store (or via [`SlugEngine::generate_unique_slug`]).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ClearResult, SlugCache, cache_key};
use crate::config::{PatternConfig, StaticConfig};
use crate::errors::{Result, SmartSlugError};
use crate::models::{Confidence, PageMetadata, SlugCandidate, SlugStyle, TierRequest, UserContext};
use crate::services::ai::{
    AiRequest, AiSlugGenerator, AiUsageRecorder, AnthropicProvider, CompletionProvider,
    NoopUsageRecorder,
};
use crate::services::collision::{Clock, CollisionResolver, SlugExistence, SystemClock};
use crate::services::heuristic::HeuristicGenerator;
use crate::services::pattern::learn_pattern;
use crate::services::signals::detect_promotional_signals;
use crate::services::tier::{ModelCatalog, select_model};
use crate::utils::{NormalizedUrl, contains_avoided, normalize_url, strip_avoided_segments};

/// Single-segment slugs used when every segment hit an avoid word
const AVOID_FALLBACKS: &[&str] = &["Link", "Url", "Go", "Page"];

/// Input to [`SlugEngine::generate_slug_with`]
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub url: String,
    pub metadata: Option<PageMetadata>,
    pub user_context: Option<UserContext>,
    pub style: Option<SlugStyle>,
}

impl GenerateRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: PageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_user_context(mut self, user_context: UserContext) -> Self {
        self.user_context = Some(user_context);
        self
    }

    pub fn with_style(mut self, style: SlugStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// The part of the engine that runs inside a spawned flight
#[derive(Clone)]
struct Pipeline {
    ai: Option<Arc<AiSlugGenerator>>,
    heuristic: HeuristicGenerator,
    catalog: ModelCatalog,
    pattern_rules: PatternConfig,
}

impl Pipeline {
    async fn run(
        self: Arc<Self>,
        url: NormalizedUrl,
        metadata: Option<PageMetadata>,
        user_context: Option<UserContext>,
        style: Option<SlugStyle>,
    ) -> Result<SlugCandidate> {
        let signals = metadata
            .as_ref()
            .map(detect_promotional_signals)
            .unwrap_or_default();
        let context = user_context.unwrap_or_default();

        if let Some(ai) = &self.ai {
            let tier = select_model(
                &self.catalog,
                &TierRequest {
                    user_tier: context.tier.clone(),
                    has_brand_guidelines: context.has_brand_guidelines,
                    has_promotional_signals: !signals.is_empty(),
                },
            );
            let request = AiRequest {
                pattern: learn_pattern(&context.historical_slugs, &self.pattern_rules),
                url: url.clone(),
                signals,
                preferences: context.preferences.clone(),
                tier,
                style,
                user_id: context.user_id.clone(),
            };

            match ai.generate(&request).await {
                Ok(candidates) => {
                    if let Some(best) = candidates.into_iter().next() {
                        return Ok(best);
                    }
                }
                Err(failure) => {
                    warn!("AI generation failed for {}: {}, using heuristic", url, failure);
                }
            }
        }

        Ok(self.heuristic.generate(&url))
    }
}

pub struct SlugEngine {
    config: StaticConfig,
    pipeline: Arc<Pipeline>,
    cache: Arc<SlugCache>,
    collision: CollisionResolver,
    provider: Option<Arc<dyn CompletionProvider>>,
    usage: Arc<dyn AiUsageRecorder>,
    ai_timeout: Option<Duration>,
}

impl SlugEngine {
    /// Build from config; AI is wired only when `ai.is_available()`
    pub fn new(config: &StaticConfig) -> Self {
        let provider: Option<Arc<dyn CompletionProvider>> = if config.ai.is_available() {
            AnthropicProvider::from_config(&config.ai).map(|p| Arc::new(p) as _)
        } else {
            info!("AI slug generation disabled, running heuristic-only");
            None
        };

        let mut engine = Self {
            config: config.clone(),
            pipeline: Arc::new(Pipeline {
                ai: None,
                heuristic: HeuristicGenerator::new(config.slug.clone()),
                catalog: ModelCatalog::new(&config.ai.models),
                pattern_rules: config.pattern.clone(),
            }),
            cache: Arc::new(SlugCache::new(&config.cache)),
            collision: CollisionResolver::new(
                Arc::new(SystemClock),
                config.collision.max_attempts,
                config.slug.max_length,
            ),
            provider,
            usage: Arc::new(NoopUsageRecorder),
            ai_timeout: None,
        };
        engine.rebuild_ai();
        engine
    }

    /// Replace the completion provider (also enables AI without an API key)
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self.rebuild_ai();
        self
    }

    /// Force heuristic-only generation
    pub fn without_ai(mut self) -> Self {
        self.provider = None;
        self.rebuild_ai();
        self
    }

    pub fn with_usage_recorder(mut self, usage: Arc<dyn AiUsageRecorder>) -> Self {
        self.usage = usage;
        self.rebuild_ai();
        self
    }

    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.ai_timeout = Some(timeout);
        self.rebuild_ai();
        self
    }

    /// Share one cache between engines
    pub fn with_cache(mut self, cache: Arc<SlugCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.collision = CollisionResolver::new(
            clock,
            self.config.collision.max_attempts,
            self.config.slug.max_length,
        );
        self
    }

    fn rebuild_ai(&mut self) {
        let ai = self.provider.as_ref().map(|provider| {
            let mut generator =
                AiSlugGenerator::new(Arc::clone(provider), &self.config.ai, &self.config.slug)
                    .with_usage_recorder(Arc::clone(&self.usage));
            if let Some(timeout) = self.ai_timeout {
                generator = generator.with_timeout(timeout);
            }
            Arc::new(generator)
        });
        let mut pipeline = (*self.pipeline).clone();
        pipeline.ai = ai;
        self.pipeline = Arc::new(pipeline);
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.pipeline.ai.is_some()
    }

    pub fn cache(&self) -> &Arc<SlugCache> {
        &self.cache
    }

    /// Generate (or fetch) the slug for a destination URL
    pub async fn generate_slug(
        &self,
        url: &str,
        metadata: Option<&PageMetadata>,
        user_context: Option<&UserContext>,
    ) -> Result<SlugCandidate> {
        self.generate_slug_with(GenerateRequest {
            url: url.to_string(),
            metadata: metadata.cloned(),
            user_context: user_context.cloned(),
            style: None,
        })
        .await
    }

    /// Style-aware variant of [`SlugEngine::generate_slug`]
    ///
    /// Only `InvalidUrl` is fatal; every AI failure degrades to the
    /// heuristic candidate.
    pub async fn generate_slug_with(&self, request: GenerateRequest) -> Result<SlugCandidate> {
        let GenerateRequest {
            url,
            metadata,
            user_context,
            style,
        } = request;

        let normalized = normalize_url(&url).map_err(|e| {
            debug!("Rejected URL '{}': {}", url, e);
            SmartSlugError::from(e)
        })?;
        let key = cache_key(&normalized, style);
        let avoid = user_context
            .as_ref()
            .map(|c| c.preferences.normalized_avoid_words())
            .unwrap_or_default();

        let pipeline = Arc::clone(&self.pipeline);
        let candidate = self
            .cache
            .get_or_generate(&key, move || {
                pipeline.run(normalized, metadata, user_context, style)
            })
            .await?;

        let candidate = enforce_avoid_words(candidate, &avoid)?;
        info!(
            "Slug for {}: '{}' (source: {}, confidence: {})",
            key, candidate.slug, candidate.source, candidate.confidence
        );
        Ok(candidate)
    }

    /// Generate, then resolve collisions against the caller's store
    pub async fn generate_unique_slug(
        &self,
        request: GenerateRequest,
        existence: &dyn SlugExistence,
    ) -> Result<SlugCandidate> {
        let candidate = self.generate_slug_with(request).await?;
        self.collision.resolve(&candidate, existence).await
    }

    pub async fn resolve_collision(
        &self,
        candidate: &SlugCandidate,
        existence: &dyn SlugExistence,
    ) -> Result<SlugCandidate> {
        self.collision.resolve(candidate, existence).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn clear_cache(&self) -> ClearResult {
        let result = self.cache.clear().await;
        info!("Slug cache cleared: {} entries", result.cleared);
        result
    }

    /// Drop the cached slug for one URL and style
    pub async fn invalidate(&self, url: &str, style: Option<SlugStyle>) -> Result<bool> {
        let normalized = normalize_url(url)?;
        Ok(self.cache.invalidate(&cache_key(&normalized, style)).await)
    }
}

/// Strip segments that contain an avoid word
///
/// The cache is shared across users, so this runs on every returned
/// candidate with the caller's own list.
fn enforce_avoid_words(candidate: SlugCandidate, avoid: &[String]) -> Result<SlugCandidate> {
    if !contains_avoided(&candidate.slug, avoid) {
        return Ok(candidate);
    }

    let slug = strip_avoided_segments(&candidate.slug, avoid)
        .or_else(|| {
            AVOID_FALLBACKS
                .iter()
                .find(|w| !contains_avoided(w, avoid))
                .map(|w| w.to_string())
        })
        .ok_or_else(|| {
            SmartSlugError::generation("every fallback slug contains an avoided word")
        })?;

    debug!("Avoid words rewrote '{}' to '{}'", candidate.slug, slug);
    Ok(SlugCandidate {
        slug,
        confidence: Confidence::Low,
        ..candidate
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlugSource;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_enforce_avoid_words_strips_segments() {
        let c = SlugCandidate::new("Shop.Cheap.Razor", SlugSource::Regex, Confidence::High);
        let out = enforce_avoid_words(c, &words(&["cheap"])).unwrap();
        assert_eq!(out.slug, "Shop.Razor");
        assert_eq!(out.confidence, Confidence::Low);
    }

    #[test]
    fn test_enforce_avoid_words_untouched() {
        let c = SlugCandidate::new("Shop.Razor", SlugSource::Ai, Confidence::High);
        let out = enforce_avoid_words(c.clone(), &words(&["cheap"])).unwrap();
        assert_eq!(out, c);
    }

    #[test]
    fn test_enforce_avoid_words_fallbacks() {
        let c = SlugCandidate::new("Linky", SlugSource::Regex, Confidence::Low);
        assert_eq!(enforce_avoid_words(c, &words(&["link"])).unwrap().slug, "Url");

        let c = SlugCandidate::new("Sale", SlugSource::Regex, Confidence::Low);
        assert!(enforce_avoid_words(c, &words(&["sale", "l", "u", "g", "p"])).is_err());
    }

    #[test]
    fn test_enforce_avoid_words_across_separator() {
        let c = SlugCandidate::new("Example.Running.Shoes", SlugSource::Regex, Confidence::High);
        let avoid = words(&["e.r"]);
        let out = enforce_avoid_words(c, &avoid).unwrap();
        assert_eq!(out.slug, "Link");
        assert!(!contains_avoided(&out.slug, &avoid));
        assert_eq!(out.confidence, Confidence::Low);
    }

    #[test]
    fn test_engine_without_key_is_heuristic_only() {
        let mut config = StaticConfig::default();
        config.ai.api_key = None;
        let engine = SlugEngine::new(&config);
        assert!(!engine.is_ai_enabled());
    }
}
