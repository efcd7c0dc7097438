use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{PromotionalSignal, SignalType, SlugStyle, UserPattern, UserPreferences};
use crate::utils::NormalizedUrl;

/// Built-in prompt; overridable with `ai.prompt_template`
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You create short, human-readable slugs for a URL shortener.

DESTINATION URL:
{url}

PROMOTIONAL CUES:
{signals}

USER NAMING PATTERN (soft guidance, follow it when it fits):
{pattern}

CONSTRAINTS:
{preferences}

STYLE:
{style}

RULES:
- Each slug is PascalCase words joined by dots, e.g. Nike.AirMax.Sale
- Only letters and digits inside a segment, no empty segments
- Never repeat the same segment twice in a row
- At most {max_length} characters per slug

Return ONLY a JSON array of {count} objects, no markdown:
[{"slug": "Merchant.Subject.Descriptor", "style": "descriptive", "reasoning": "one short sentence"}]"#;

/// Everything the prompt can mention
pub struct PromptContext<'a> {
    pub url: &'a NormalizedUrl,
    pub signals: &'a [PromotionalSignal],
    pub pattern: &'a UserPattern,
    pub preferences: &'a UserPreferences,
    pub style: Option<SlugStyle>,
    pub count: usize,
    pub max_length: usize,
}

static PLACEHOLDER_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\{(url|signals|pattern|preferences|style|count|max_length)\}")
        .map_err(|e| tracing::error!("Invalid placeholder pattern: {}", e))
        .ok()
});

/// Fill the template placeholders
///
/// Single pass over the template; placeholder-like text inside the
/// substituted values is left alone.
pub fn render_prompt(template: &str, ctx: &PromptContext<'_>) -> String {
    let Some(regex) = PLACEHOLDER_REGEX.as_ref() else {
        return template.to_string();
    };
    regex
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "url" => ctx.url.to_string(),
            "signals" => describe_signals(ctx.signals),
            "pattern" => describe_pattern(ctx.pattern),
            "preferences" => describe_preferences(ctx.preferences),
            "style" => describe_style(ctx.style, ctx.preferences),
            "count" => ctx.count.to_string(),
            "max_length" => ctx.max_length.to_string(),
            other => format!("{{{}}}", other),
        })
        .into_owned()
}

fn describe_signals(signals: &[PromotionalSignal]) -> String {
    if signals.is_empty() {
        return "- none detected; keep the slug neutral and descriptive".to_string();
    }
    let mut lines: Vec<String> = signals
        .iter()
        .take(5)
        .map(|s| format!("- {} ({}): \"{}\"", s.signal_type, s.priority, s.matched_text))
        .collect();
    // strongest cue first after sorting
    let hint = match signals[0].signal_type {
        SignalType::Discount | SignalType::Price => "lead with the offer (e.g. the discount)",
        SignalType::Urgency => "favor urgency wording such as Today or Now",
        SignalType::Scarcity => "convey limited availability",
        SignalType::Social => "hint at popularity",
        SignalType::Free => "mention what is free",
        SignalType::Exclusive => "convey exclusivity",
        SignalType::New => "mark it as new",
        SignalType::Guarantee => "mention the guarantee only if it fits",
    };
    lines.push(format!("- in at least one suggestion, {}", hint));
    lines.join("\n")
}

fn describe_pattern(pattern: &UserPattern) -> String {
    if !pattern.is_informative() {
        return "- no history yet".to_string();
    }
    let mut lines = vec![
        format!(
            "- typical structure: {}",
            pattern.structure.as_deref().unwrap_or("unknown")
        ),
        format!("- about {:.0} segments per slug", pattern.avg_word_count.round()),
        format!("- capitalization: {}", pattern.capitalization),
    ];
    if pattern.includes_brand {
        lines.push("- usually starts with the brand or merchant".to_string());
    }
    if pattern.includes_year {
        lines.push("- usually ends with a four-digit year".to_string());
    }
    if pattern.uses_cta {
        lines.push("- often contains a call to action (Shop, Get, Save...)".to_string());
    }
    lines.push(format!("- pattern confidence: {:.2}", pattern.confidence));
    lines.join("\n")
}

fn describe_preferences(preferences: &UserPreferences) -> String {
    let mut lines = Vec::new();
    if let Some(industry) = preferences.industry.as_deref() {
        lines.push(format!("- industry: {}", industry));
    }
    if let Some(voice) = preferences.brand_voice.as_deref() {
        lines.push(format!("- brand voice: {}", voice));
    }
    if let Some(length) = preferences.preferred_length {
        lines.push(format!("- preferred length: about {} characters", length));
    }
    let avoid = preferences.normalized_avoid_words();
    if !avoid.is_empty() {
        lines.push(format!(
            "- NEVER use these words, not even inside another word: {}",
            avoid.join(", ")
        ));
    }
    let include = preferences.normalized_must_include();
    if !include.is_empty() {
        lines.push(format!("- include when possible: {}", include.join(", ")));
    }
    if lines.is_empty() {
        "- none".to_string()
    } else {
        lines.join("\n")
    }
}

fn describe_style(style: Option<SlugStyle>, preferences: &UserPreferences) -> String {
    match (style, preferences.preferred_style.as_deref()) {
        (Some(style), _) => format!("- {}", style.prompt_hint()),
        (None, Some(preferred)) => format!("- {}", preferred),
        (None, None) => format!("- {}", SlugStyle::default().prompt_hint()),
    }
}
