pub mod url_normalizer;

pub use url_normalizer::{NormalizedUrl, UrlValidationError, normalize_url, validate_url};

/// PascalCase a single word, keeping only ASCII alphanumerics
///
/// Interior case is preserved (`MacBook` stays `MacBook`).
pub fn to_pascal_case(word: &str) -> String {
    let mut chars = word.chars().filter(|c| c.is_ascii_alphanumeric());
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.collect::<String>(),
        None => String::new(),
    }
}

/// Render `n` in lower-case base 36
pub fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Check the slug grammar: `^[A-Za-z0-9]+(\.[A-Za-z0-9]+)*$`, the length
/// budget, and no two consecutive identical segments
pub fn is_valid_slug(slug: &str, max_length: usize) -> bool {
    if slug.is_empty() || slug.len() > max_length {
        return false;
    }
    let mut prev: Option<&str> = None;
    for segment in slug.split('.') {
        if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        if prev.is_some_and(|p| p.eq_ignore_ascii_case(segment)) {
            return false;
        }
        prev = Some(segment);
    }
    true
}

/// Whether `text` contains any of the (lower-cased) avoid words
pub fn contains_avoided(text: &str, avoid_words: &[String]) -> bool {
    if avoid_words.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    avoid_words.iter().any(|w| lower.contains(w.as_str()))
}

/// Drop consecutive duplicate segments (case-insensitive)
pub fn collapse_repeats(segments: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        if out.last().is_some_and(|l| l.eq_ignore_ascii_case(&segment)) {
            continue;
        }
        out.push(segment);
    }
    out
}

/// Trim trailing segments until the dot-joined slug fits `max_length`
///
/// A lone oversized segment is cut at the budget.
pub fn fit_segments(mut segments: Vec<String>, max_length: usize) -> Vec<String> {
    while segments.len() > 1 && joined_len(&segments) > max_length {
        segments.pop();
    }
    if let Some(first) = segments.first_mut()
        && first.len() > max_length
    {
        first.truncate(max_length);
    }
    segments
}

fn joined_len(segments: &[String]) -> usize {
    segments.iter().map(String::len).sum::<usize>() + segments.len().saturating_sub(1)
}

/// Remove every segment containing an avoid word
///
/// Returns `None` when nothing is left.
pub fn strip_avoided_segments(slug: &str, avoid_words: &[String]) -> Option<String> {
    let kept: Vec<String> = slug
        .split('.')
        .filter(|s| !contains_avoided(s, avoid_words))
        .map(str::to_string)
        .collect();
    let kept = collapse_repeats(kept);
    if kept.is_empty() {
        return None;
    }
    // an avoid word can span the separator
    Some(kept.join(".")).filter(|joined| !contains_avoided(joined, avoid_words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("razor"), "Razor");
        assert_eq!(to_pascal_case("MacBook"), "MacBook");
        assert_eq!(to_pascal_case("harry's"), "Harrys");
        assert_eq!(to_pascal_case("--"), "");
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("Bjs.Harrys.Razor", 50));
        assert!(is_valid_slug("A", 50));
        assert!(!is_valid_slug("", 50));
        assert!(!is_valid_slug("Bjs..Razor", 50));
        assert!(!is_valid_slug("Bjs.Razor.", 50));
        assert!(!is_valid_slug("Bjs-Razor", 50));
        assert!(!is_valid_slug("Bjs.Razor.razor", 50));
        assert!(!is_valid_slug(&"A".repeat(51), 50));
    }

    #[test]
    fn test_fit_segments() {
        let segs: Vec<String> = ["Alpha", "Beta", "Gamma"].iter().map(|s| s.to_string()).collect();
        assert_eq!(fit_segments(segs.clone(), 50), segs);
        assert_eq!(fit_segments(segs, 10), vec!["Alpha", "Beta"]);
        assert_eq!(fit_segments(vec!["A".repeat(60)], 50)[0].len(), 50);
    }

    #[test]
    fn test_strip_avoided_segments() {
        let avoid = vec!["cheap".to_string()];
        assert_eq!(
            strip_avoided_segments("Shop.CheapRazor.Pack", &avoid).as_deref(),
            Some("Shop.Pack")
        );
        assert_eq!(strip_avoided_segments("Cheap", &avoid), None);
    }
}
