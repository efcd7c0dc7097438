//! Promotional signal detection
//!
//! A fixed, ordered rule table is matched against title + description; the
//! price field has its own matcher. Adding a signal kind is a table change.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{PageMetadata, PromotionalSignal, SignalPriority, SignalType};

/// `(type, priority, pattern)`; patterns are compiled case-insensitive
const SIGNAL_RULES: &[(SignalType, SignalPriority, &str)] = &[
    (
        SignalType::Discount,
        SignalPriority::High,
        r"\b\d{1,3}(?:\.\d+)?\s?%\s?off\b",
    ),
    (
        SignalType::Discount,
        SignalPriority::High,
        r"(?:[$€£]\s?\d[\d,]*(?:\.\d{1,2})?\s+off\b|\bsave\s+(?:up\s+to\s+)?[$€£]?\d[\d,]*%?)",
    ),
    (
        SignalType::Discount,
        SignalPriority::High,
        r"\b(?:sale|discount(?:ed)?|clearance|markdown|bogo|buy one,? get one|promo code|coupon)\b",
    ),
    (
        SignalType::Urgency,
        SignalPriority::High,
        r"\b(?:today only|limited[- ]time|ends (?:today|tonight|soon|sunday|midnight)|last chance|hurry|flash sale|final hours?|\d+ hours? left|don'?t miss|deadline)\b",
    ),
    (
        SignalType::Scarcity,
        SignalPriority::High,
        r"\b(?:only \d+ left|limited (?:stock|quantit(?:y|ies)|edition|supply)|while supplies last|almost gone|selling fast|low stock|few left)\b",
    ),
    (
        SignalType::Social,
        SignalPriority::Medium,
        r"(?:\bbest[- ]?sell(?:er|ing)\b|#1\b|\btop[- ]rated\b|\bmost popular\b|\btrending\b|\b\d[\d,.]*k?\+? (?:reviews|customers|sold|ratings)\b|\b[1-5](?:\.\d)? stars?\b)",
    ),
    (
        SignalType::Free,
        SignalPriority::Medium,
        r"\bfree(?:\s+(?:shipping|delivery|gift|trial|returns))?\b",
    ),
    (
        SignalType::Exclusive,
        SignalPriority::Medium,
        r"\b(?:exclusive|members?[- ]only|vip|invite[- ]only|early access)\b",
    ),
    (
        SignalType::New,
        SignalPriority::Low,
        r"\b(?:new arrivals?|brand[- ]new|just (?:launched|arrived|dropped)|introducing|new)\b",
    ),
    (
        SignalType::Guarantee,
        SignalPriority::Low,
        r"\b(?:guarantee[ds]?|money[- ]back|risk[- ]free|warranty)\b",
    ),
];

const PRICE_PATTERN: &str = r"(?:[$€£¥]\s?\d[\d,]*(?:\.\d{1,2})?|\b\d[\d,]*(?:\.\d{1,2})?\s?(?:usd|eur|gbp|dollars?|euros?)\b)";

struct CompiledRule {
    signal_type: SignalType,
    priority: SignalPriority,
    regex: Regex,
}

static RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    SIGNAL_RULES
        .iter()
        .filter_map(|(signal_type, priority, pattern)| {
            Regex::new(&format!("(?i){}", pattern))
                .map(|regex| CompiledRule {
                    signal_type: *signal_type,
                    priority: *priority,
                    regex,
                })
                .map_err(|e| tracing::error!("Invalid signal rule for {}: {}", signal_type, e))
                .ok()
        })
        .collect()
});

static PRICE_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(&format!("(?i){}", PRICE_PATTERN))
        .map_err(|e| tracing::error!("Invalid price pattern: {}", e))
        .ok()
});

/// Detect promotional cues in caller-supplied metadata
///
/// Pure and deterministic. Signals come back sorted by priority (high
/// first), in detection order within a priority. Exact repeats of the same
/// type and text (e.g. title echoed in description) are reported once.
pub fn detect_promotional_signals(metadata: &PageMetadata) -> Vec<PromotionalSignal> {
    let text = [metadata.title.as_deref(), metadata.description.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut signals: Vec<PromotionalSignal> = Vec::new();

    if !text.is_empty() {
        for rule in RULES.iter() {
            for m in rule.regex.find_iter(&text) {
                push_unique(&mut signals, rule.signal_type, rule.priority, m.as_str());
            }
        }
    }

    if let Some(price) = metadata.price.as_deref().map(str::trim).filter(|p| !p.is_empty())
        && let Some(price_regex) = PRICE_REGEX.as_ref()
    {
        for m in price_regex.find_iter(price) {
            push_unique(&mut signals, SignalType::Price, SignalPriority::Medium, m.as_str());
        }
    }

    // sort_by_key is stable
    signals.sort_by_key(|s| s.priority);
    signals
}

fn push_unique(
    signals: &mut Vec<PromotionalSignal>,
    signal_type: SignalType,
    priority: SignalPriority,
    matched: &str,
) {
    let matched = matched.trim();
    if matched.is_empty() {
        return;
    }
    let duplicate = signals
        .iter()
        .any(|s| s.signal_type == signal_type && s.matched_text.eq_ignore_ascii_case(matched));
    if !duplicate {
        signals.push(PromotionalSignal {
            signal_type,
            matched_text: matched.to_string(),
            priority,
        });
    }
}

/// Highest-priority signal, if any
pub fn primary_signal(signals: &[PromotionalSignal]) -> Option<&PromotionalSignal> {
    signals.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(RULES.len(), SIGNAL_RULES.len());
        assert!(PRICE_REGEX.is_some());
    }

    #[test]
    fn test_discount_percent() {
        let metadata = PageMetadata::with_title("Amazing Product - 50% off Today!");
        let signals = detect_promotional_signals(&metadata);
        let discount = signals
            .iter()
            .find(|s| s.signal_type == SignalType::Discount)
            .expect("discount signal");
        assert_eq!(discount.priority, SignalPriority::High);
        assert!(discount.matched_text.to_lowercase().contains("50% off"));
    }

    #[test]
    fn test_multiple_types_from_one_field() {
        let signals = detect_promotional_signals(&PageMetadata::with_title(
            "Bestseller: free shipping, only 3 left!",
        ));
        let types: Vec<SignalType> = signals.iter().map(|s| s.signal_type).collect();
        assert!(types.contains(&SignalType::Scarcity));
        assert!(types.contains(&SignalType::Social));
        assert!(types.contains(&SignalType::Free));
        assert_eq!(signals[0].signal_type, SignalType::Scarcity);
    }

    #[test]
    fn test_price_field_only() {
        let metadata = PageMetadata {
            price: Some("$19.99".into()),
            ..Default::default()
        };
        let signals = detect_promotional_signals(&metadata);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal_type, SignalType::Price);
        assert_eq!(signals[0].priority, SignalPriority::Medium);
        assert_eq!(signals[0].matched_text, "$19.99");
    }

    #[test]
    fn test_repeated_text_reported_once() {
        let metadata = PageMetadata {
            title: Some("Flash sale".into()),
            description: Some("flash sale on everything".into()),
            price: None,
        };
        let urgency: Vec<_> = detect_promotional_signals(&metadata)
            .into_iter()
            .filter(|s| s.signal_type == SignalType::Urgency)
            .collect();
        assert_eq!(urgency.len(), 1);
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        let signals =
            detect_promotional_signals(&PageMetadata::with_title("Quarterly engineering report"));
        assert!(signals.is_empty());
    }
}
