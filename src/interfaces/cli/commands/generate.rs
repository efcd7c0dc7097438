//! Generate command

use std::collections::HashSet;

use async_trait::async_trait;

use super::print_candidate;
use crate::cli::MetadataArgs;
use crate::config::get_config;
use crate::errors::Result as SlugResult;
use crate::interfaces::cli::{CliError, print_json};
use crate::models::{PageMetadata, SlugStyle, UserContext, UserPreferences};
use crate::services::{GenerateRequest, SlugEngine, SlugExistence};

/// Flags of the `generate` subcommand
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub url: String,
    pub metadata: MetadataArgs,
    pub tier: Option<String>,
    pub style: Option<SlugStyle>,
    pub avoid: Vec<String>,
    pub include: Vec<String>,
    pub history: Vec<String>,
    pub brand_guidelines: bool,
    pub user_id: Option<String>,
    pub taken: Vec<String>,
    pub no_ai: bool,
}

/// Existence check against slugs given on the command line
struct TakenSlugs(HashSet<String>);

#[async_trait]
impl SlugExistence for TakenSlugs {
    async fn exists(&self, slug: &str) -> SlugResult<bool> {
        Ok(self.0.contains(slug))
    }
}

impl GenerateOptions {
    fn into_request(self) -> (GenerateRequest, HashSet<String>) {
        let metadata = PageMetadata {
            title: self.metadata.title,
            description: self.metadata.description,
            price: self.metadata.price,
        };
        let context = UserContext {
            user_id: self.user_id,
            tier: self.tier,
            preferences: UserPreferences {
                avoid_words: self.avoid.into_iter().collect(),
                must_include: self.include.into_iter().collect(),
                ..Default::default()
            },
            historical_slugs: self.history,
            has_brand_guidelines: self.brand_guidelines,
        };

        let mut request = GenerateRequest::new(self.url).with_user_context(context);
        if !metadata.is_empty() {
            request = request.with_metadata(metadata);
        }
        if let Some(style) = self.style {
            request = request.with_style(style);
        }
        (request, self.taken.into_iter().collect())
    }
}

pub async fn generate_slug(options: GenerateOptions, json: bool) -> Result<(), CliError> {
    let config = get_config();
    let mut engine = SlugEngine::new(&config);
    if options.no_ai {
        engine = engine.without_ai();
    }

    let (request, taken) = options.into_request();
    let candidate = if taken.is_empty() {
        engine.generate_slug_with(request).await?
    } else {
        engine
            .generate_unique_slug(request, &TakenSlugs(taken))
            .await?
    };

    if json {
        return print_json(&candidate);
    }
    print_candidate(&candidate);
    Ok(())
}
