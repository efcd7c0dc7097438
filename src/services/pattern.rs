//! Per-user slug pattern learning
//!
//! Derives a structural profile from a user's recent slugs. The result is a
//! soft bias for the AI prompt, never a constraint.

use std::collections::HashMap;

use crate::config::PatternConfig;
use crate::models::{Capitalization, UserPattern};

const SEPARATORS: [char; 3] = ['.', '-', '_'];

const CTA_WORDS: &[&str] = &[
    "shop", "buy", "get", "save", "deal", "deals", "try", "join", "learn", "download", "order",
    "book", "signup", "register", "subscribe", "claim", "grab", "discover", "explore", "watch",
    "read", "start", "free",
];

/// Words that open many slugs without naming a brand
const GENERIC_LEADS: &[&str] = &[
    "the", "new", "best", "top", "my", "our", "your", "link", "go", "page", "post", "blog",
    "sale", "promo", "offer",
];

/// Role a segment plays in a slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SegmentRole {
    Brand,
    Cta,
    Year,
    Number,
    Word,
}

impl SegmentRole {
    fn label(&self) -> &'static str {
        match self {
            SegmentRole::Brand => "Brand",
            SegmentRole::Cta => "Cta",
            SegmentRole::Year => "Year",
            SegmentRole::Number => "Number",
            SegmentRole::Word => "Word",
        }
    }
}

/// Learn a pattern from the most recent slugs (most recent first)
///
/// Confidence is the share of sampled slugs matching the dominant structure,
/// and 0 when fewer than `min_samples` usable slugs are available.
pub fn learn_pattern(slugs: &[String], rules: &PatternConfig) -> UserPattern {
    let sample: Vec<&str> = slugs
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(rules.sample_size)
        .collect();

    if sample.is_empty() {
        return UserPattern::default();
    }

    let separator = dominant_separator(&sample);
    let split: Vec<Vec<&str>> = sample
        .iter()
        .map(|s| s.split(separator).filter(|p| !p.is_empty()).collect())
        .collect();

    let total = sample.len();
    let avg_word_count = split.iter().map(Vec::len).sum::<usize>() as f64 / total as f64;
    let capitalization = dominant_capitalization(&split);

    let mut brand_hits = 0;
    let mut year_hits = 0;
    let mut cta_hits = 0;
    let mut signatures: Vec<String> = Vec::with_capacity(total);

    for segments in &split {
        let roles: Vec<SegmentRole> = segments
            .iter()
            .enumerate()
            .map(|(i, s)| classify(s, i == 0))
            .collect();
        if roles.first() == Some(&SegmentRole::Brand) {
            brand_hits += 1;
        }
        if roles.last() == Some(&SegmentRole::Year) {
            year_hits += 1;
        }
        if roles.contains(&SegmentRole::Cta) {
            cta_hits += 1;
        }
        signatures.push(
            roles
                .iter()
                .map(SegmentRole::label)
                .collect::<Vec<_>>()
                .join("."),
        );
    }

    let majority = |hits: usize| hits * 2 > total;

    let mut pattern = UserPattern {
        structure: None,
        avg_word_count,
        separator,
        capitalization,
        includes_brand: majority(brand_hits),
        includes_year: majority(year_hits),
        uses_cta: majority(cta_hits),
        confidence: 0.0,
        sample_size: total,
    };

    if total < rules.min_samples {
        return pattern;
    }

    if let Some((structure, count)) = dominant_signature(&signatures) {
        pattern.confidence = count as f64 / total as f64;
        pattern.structure = Some(structure);
    }
    pattern
}

fn dominant_separator(sample: &[&str]) -> char {
    let mut best = '.';
    let mut best_count = 0;
    for sep in SEPARATORS {
        let count: usize = sample.iter().map(|s| s.matches(sep).count()).sum();
        if count > best_count {
            best = sep;
            best_count = count;
        }
    }
    best
}

fn dominant_capitalization(split: &[Vec<&str>]) -> Capitalization {
    let mut pascal = 0;
    let mut lower = 0;
    for segments in split {
        let letters = || segments.iter().filter(|s| s.chars().any(|c| c.is_alphabetic()));
        let capitalized = |s: &&str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
        };
        if letters().all(capitalized) {
            pascal += 1;
        } else if letters().all(|s| !s.chars().any(|c| c.is_uppercase())) {
            lower += 1;
        }
    }
    let total = split.len();
    if pascal * 2 > total || (pascal >= lower && pascal > 0 && pascal + lower == total) {
        Capitalization::PascalCase
    } else if lower * 2 > total {
        Capitalization::Lowercase
    } else {
        Capitalization::Mixed
    }
}

fn classify(segment: &str, first: bool) -> SegmentRole {
    let lower = segment.to_lowercase();
    if lower.len() == 4
        && lower.chars().all(|c| c.is_ascii_digit())
        && (lower.starts_with("19") || lower.starts_with("20"))
    {
        return SegmentRole::Year;
    }
    if lower.chars().all(|c| c.is_ascii_digit()) {
        return SegmentRole::Number;
    }
    if CTA_WORDS.contains(&lower.as_str()) {
        return SegmentRole::Cta;
    }
    if first
        && lower.len() >= 2
        && lower.chars().all(|c| c.is_alphanumeric())
        && !GENERIC_LEADS.contains(&lower.as_str())
    {
        return SegmentRole::Brand;
    }
    SegmentRole::Word
}

/// Most frequent signature; ties go to the one seen first
fn dominant_signature(signatures: &[String]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, sig) in signatures.iter().enumerate() {
        let entry = counts.entry(sig.as_str()).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(sig, (count, _))| (sig.to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_too_few_samples_has_zero_confidence() {
        let pattern = learn_pattern(
            &slugs(&["Nike.Shoes", "Adidas.Boots"]),
            &PatternConfig::default(),
        );
        assert_eq!(pattern.confidence, 0.0);
        assert!(pattern.structure.is_none());
        assert_eq!(pattern.sample_size, 2);
        assert_eq!(pattern.avg_word_count, 2.0);
    }

    #[test]
    fn test_classify_roles() {
        assert_eq!(classify("2024", false), SegmentRole::Year);
        assert_eq!(classify("Shop", true), SegmentRole::Cta);
        assert_eq!(classify("Nike", true), SegmentRole::Brand);
        assert_eq!(classify("Nike", false), SegmentRole::Word);
        assert_eq!(classify("Best", true), SegmentRole::Word);
    }

    #[test]
    fn test_dominant_signature_tie_prefers_first_seen() {
        let sigs = slugs(&["Brand.Word", "Brand.Word.Year", "Brand.Word.Year", "Brand.Word"]);
        assert_eq!(dominant_signature(&sigs), Some(("Brand.Word".to_string(), 2)));
    }
}
