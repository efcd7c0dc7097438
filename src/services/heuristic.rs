//! Deterministic URL-structure slug generator
//!
//! 纯函数、无网络依赖，是 AI 失败时的无条件兜底路径。

use crate::config::SlugConfig;
use crate::models::{Confidence, SlugCandidate, SlugComponents, SlugSource};
use crate::utils::{NormalizedUrl, collapse_repeats, fit_segments, normalize_url, to_pascal_case};

/// Fallback word when nothing meaningful survives
const FALLBACK_WORD: &str = "Link";

/// Host labels that never name the merchant
const GENERIC_HOST_LABELS: &[&str] = &["m", "mobile", "amp", "shop", "store", "web", "app"];

/// Path segments that carry no meaning on their own
const BOILERPLATE_SEGMENTS: &[&str] = &[
    "product", "products", "item", "items", "dp", "gp", "ip", "shop", "store", "category",
    "categories", "catalog", "collections", "collection", "pages", "page", "detail", "details",
    "index", "view", "en", "us", "en-us", "en-gb", "de-de", "fr-fr", "www", "amp", "buy", "browse",
    "listing", "listings", "post", "posts", "article", "articles", "blog",
];

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "your", "our", "you", "are", "was",
    "not", "but", "all", "any", "can", "has", "have", "into", "its", "per", "via", "www", "html",
    "htm", "php", "aspx", "index", "amp", "new", "get",
];

const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "php", "aspx", "asp", "jsp", "shtml"];

/// Generator bound to a slug budget
#[derive(Debug, Clone, Default)]
pub struct HeuristicGenerator {
    rules: SlugConfig,
}

impl HeuristicGenerator {
    pub fn new(rules: SlugConfig) -> Self {
        Self { rules }
    }

    /// Derive a slug from URL structure alone
    ///
    /// Never fails; degrades to `Merchant.Link` with low confidence.
    pub fn generate(&self, url: &NormalizedUrl) -> SlugCandidate {
        let merchant = merchant_label(url.host());

        let mut segment_words: Vec<Vec<String>> = Vec::new();
        for raw in url.path_segments() {
            let decoded = urlencoding::decode(raw)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            if is_boilerplate_segment(&decoded) {
                continue;
            }
            let words = extract_words(&decoded, self.rules.max_words_per_segment);
            if !words.is_empty() {
                segment_words.push(words);
            }
        }

        // segments that only repeat the merchant name add nothing
        let meaningful = segment_words
            .iter()
            .filter(|words| words.iter().any(|w| !w.eq_ignore_ascii_case(&merchant)))
            .count();
        let components = SlugComponents {
            merchant: (!merchant.is_empty()).then(|| merchant.clone()),
            product: segment_words.first().map(|w| w.concat()),
            modifier: if meaningful > 1 {
                segment_words.last().and_then(|w| w.first().cloned())
            } else {
                None
            },
            ..Default::default()
        };

        if meaningful == 0 {
            return self.degraded(&merchant).with_components(components);
        }

        let mut segments = Vec::with_capacity(self.rules.max_segments);
        if !merchant.is_empty() {
            segments.push(merchant.clone());
        }
        segments.extend(segment_words.into_iter().flatten());

        let mut segments = collapse_repeats(segments);
        segments.truncate(self.rules.max_segments);
        let segments = fit_segments(segments, self.rules.max_length);
        if !merchant.is_empty() && segments.len() < 2 {
            return self.degraded(&merchant).with_components(components);
        }

        let confidence = match meaningful {
            0 => Confidence::Low,
            1 => Confidence::Medium,
            _ => Confidence::High,
        };

        SlugCandidate::new(segments.join("."), SlugSource::Regex, confidence)
            .with_components(components)
    }

    /// String entry point that degrades even on unparsable input
    pub fn generate_from_str(&self, url: &str) -> SlugCandidate {
        match normalize_url(url) {
            Ok(normalized) => self.generate(&normalized),
            Err(e) => {
                tracing::debug!("Heuristic fallback on unparsable URL '{}': {}", url, e);
                let merchant = merchant_label(&raw_host_guess(url));
                let components = SlugComponents {
                    merchant: (!merchant.is_empty()).then(|| merchant.clone()),
                    ..Default::default()
                };
                self.degraded(&merchant).with_components(components)
            }
        }
    }

    fn degraded(&self, merchant: &str) -> SlugCandidate {
        let segments = if merchant.is_empty() {
            vec![FALLBACK_WORD.to_string()]
        } else {
            collapse_repeats(vec![merchant.to_string(), FALLBACK_WORD.to_string()])
        };
        let segments = fit_segments(segments, self.rules.max_length);
        SlugCandidate::new(segments.join("."), SlugSource::Regex, Confidence::Low)
    }
}

/// Heuristic slug with the default budget
pub fn generate_heuristic_slug(url: &str) -> SlugCandidate {
    HeuristicGenerator::default().generate_from_str(url)
}

/// PascalCased first meaningful host label
fn merchant_label(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let mut idx = 0;
    // keep at least "name.tld"
    while idx + 2 < labels.len() && GENERIC_HOST_LABELS.contains(&labels[idx]) {
        idx += 1;
    }
    labels
        .get(idx)
        .map(|label| label.split('-').map(to_pascal_case).collect::<String>())
        .unwrap_or_default()
}

/// Host-ish prefix of a string that failed to parse as a URL
fn raw_host_guess(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

fn is_boilerplate_segment(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    if lower.len() <= 2 || lower.contains('=') {
        return true;
    }
    if lower.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if BOILERPLATE_SEGMENTS.contains(&lower.as_str()) {
        return true;
    }
    // a-12345 style ids
    let bytes = lower.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b'-'
        && bytes[2..].iter().all(|b| b.is_ascii_alphanumeric())
        && bytes[2..].iter().any(|b| b.is_ascii_digit())
}

fn strip_page_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, ext)) if PAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => stem,
        _ => segment,
    }
}

fn is_year(word: &str) -> bool {
    word.len() == 4
        && word.chars().all(|c| c.is_ascii_digit())
        && (word.starts_with("19") || word.starts_with("20"))
}

fn looks_like_id(word: &str) -> bool {
    let digits = word.chars().filter(|c| c.is_ascii_digit()).count();
    if digits == word.len() {
        return !is_year(word);
    }
    word.len() >= 8 && digits >= 4
}

fn extract_words(segment: &str, max_words: usize) -> Vec<String> {
    strip_page_extension(segment)
        .split(['-', '_', '+', ' ', '.', ','])
        .filter_map(|word| {
            let clean: String = word.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let lower = clean.to_ascii_lowercase();
            if clean.len() <= 2 || STOPWORDS.contains(&lower.as_str()) || looks_like_id(&clean) {
                None
            } else {
                Some(to_pascal_case(&clean))
            }
        })
        .take(max_words)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_label_skips_generic_subdomains() {
        assert_eq!(merchant_label("bjs.com"), "Bjs");
        assert_eq!(merchant_label("m.nike.com"), "Nike");
        assert_eq!(merchant_label("shop.com"), "Shop");
        assert_eq!(merchant_label("bed-bath.com"), "BedBath");
    }

    #[test]
    fn test_boilerplate_segments() {
        assert!(is_boilerplate_segment("p"));
        assert!(is_boilerplate_segment("a-12345"));
        assert!(is_boilerplate_segment("3000000000003879255"));
        assert!(is_boilerplate_segment("ref=sr_1_1"));
        assert!(is_boilerplate_segment("Products"));
        assert!(!is_boilerplate_segment("harrys-razor"));
    }

    #[test]
    fn test_extract_words_caps_and_filters() {
        let words = extract_words("harrys-5-blade-razor-handle-value-pack", 4);
        assert_eq!(words, vec!["Harrys", "Blade", "Razor", "Handle"]);
        assert_eq!(extract_words("summer-sale-2025.html", 4), vec!["Summer", "Sale", "2025"]);
    }

    #[test]
    fn test_raw_host_guess() {
        assert_eq!(raw_host_guess("htp://www.Foo.com/x"), "foo.com");
        assert_eq!(raw_host_guess("not a url"), "not a url");
    }

    #[test]
    fn test_degrades_on_garbage() {
        let candidate = generate_heuristic_slug("::::");
        assert_eq!(candidate.slug, "Link");
        assert_eq!(candidate.confidence, Confidence::Low);
    }
}
