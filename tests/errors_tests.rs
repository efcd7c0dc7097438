use smartslug::errors::{Result, SmartSlugError};
use smartslug::utils::normalize_url;
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let cases = [
            (SmartSlugError::invalid_url("x"), "E001"),
            (SmartSlugError::slug_exhausted("x"), "E002"),
            (SmartSlugError::existence_check("x"), "E003"),
            (SmartSlugError::generation("x"), "E004"),
            (SmartSlugError::config("x"), "E005"),
            (SmartSlugError::serialization("x"), "E006"),
        ];
        for (error, code) in cases {
            assert_eq!(error.code(), code);
            assert_eq!(error.message(), "x");
        }
    }

    #[test]
    fn test_display_uses_simple_format() {
        let error = SmartSlugError::slug_exhausted("no free variant of 'Nike.Air'");
        assert_eq!(
            error.to_string(),
            "Slug Exhausted: no free variant of 'Nike.Air'"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SmartSlugError::generation("x").is_retryable());
        assert!(SmartSlugError::existence_check("x").is_retryable());
        assert!(!SmartSlugError::invalid_url("x").is_retryable());
        assert!(!SmartSlugError::slug_exhausted("x").is_retryable());
    }

    #[test]
    fn test_colored_format_contains_code() {
        let formatted = SmartSlugError::config("bad value").format_colored();
        assert!(formatted.contains("E005"));
        assert!(formatted.contains("bad value"));
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    fn parse_json(text: &str) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(text)?)
    }

    #[test]
    fn test_from_serde_json() {
        assert!(matches!(
            parse_json("{not json"),
            Err(SmartSlugError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_url_validation_error() {
        let error: SmartSlugError = normalize_url("javascript:alert(1)").unwrap_err().into();
        assert!(matches!(error, SmartSlugError::InvalidUrl(_)));
        assert!(error.message().contains("javascript:"));
    }

    #[test]
    fn test_from_url_parse_error() {
        let error: SmartSlugError = url::Url::parse("http://[::1").unwrap_err().into();
        assert_eq!(error.code(), "E001");
    }
}
