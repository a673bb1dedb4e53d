//! Resource locator normalisation.
//!
//! Core translation files are addressed relative to the hosting origin, while
//! module translation files are addressed relative to the module itself. The
//! helpers here decide which locators are already absolute.

use regex::Regex;
use std::sync::OnceLock;

static ABSOLUTE_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static MODULE_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static DUPLICATE_SLASH_REGEX: OnceLock<Regex> = OnceLock::new();

/// Normalize a core resource path to an absolute locator.
///
/// Without an origin (non-browser hosting) the path is returned as-is.
/// Absolute `http(s)` URLs are left untouched, root-relative paths are
/// prefixed with the origin, and anything else is joined onto the origin
/// with duplicate slashes squashed.
pub fn to_absolute(origin: Option<&str>, path: &str) -> String {
    let Some(origin) = origin else {
        return path.to_string();
    };
    if path.is_empty() {
        return path.to_string();
    }

    let absolute = ABSOLUTE_URL_REGEX.get_or_init(|| Regex::new(r"(?i)^https?://").unwrap());
    if absolute.is_match(path) {
        return path.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        return format!("{}{}", origin, path);
    }

    let slashes = DUPLICATE_SLASH_REGEX.get_or_init(|| Regex::new(r"([^:]/)/+").unwrap());
    slashes
        .replace_all(&format!("{}/{}", origin, path), "${1}")
        .into_owned()
}

/// Whether a module translation path bypasses the module's own resolver.
pub fn is_passthrough(path: &str) -> bool {
    let url = MODULE_URL_REGEX.get_or_init(|| Regex::new(r"^https?://").unwrap());
    url.is_match(path) || path.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "http://localhost:8080";

    // ==================== to_absolute Tests ====================

    #[test]
    fn test_to_absolute_without_origin_is_identity() {
        assert_eq!(to_absolute(None, "translations/de.json"), "translations/de.json");
        assert_eq!(to_absolute(None, "/translations/de.json"), "/translations/de.json");
    }

    #[test]
    fn test_to_absolute_empty_path() {
        assert_eq!(to_absolute(Some(ORIGIN), ""), "");
    }

    #[test]
    fn test_to_absolute_keeps_absolute_urls() {
        assert_eq!(
            to_absolute(Some(ORIGIN), "https://cdn.example.com/de.json"),
            "https://cdn.example.com/de.json"
        );
        assert_eq!(
            to_absolute(Some(ORIGIN), "HTTP://cdn.example.com/de.json"),
            "HTTP://cdn.example.com/de.json"
        );
    }

    #[test]
    fn test_to_absolute_root_relative() {
        assert_eq!(
            to_absolute(Some(ORIGIN), "/translations/de.json"),
            "http://localhost:8080/translations/de.json"
        );
    }

    #[test]
    fn test_to_absolute_relative() {
        assert_eq!(
            to_absolute(Some(ORIGIN), "translations/de.json"),
            "http://localhost:8080/translations/de.json"
        );
    }

    #[test]
    fn test_to_absolute_squashes_duplicate_slashes() {
        assert_eq!(
            to_absolute(Some(ORIGIN), "translations//nested///de.json"),
            "http://localhost:8080/translations/nested/de.json"
        );
    }

    #[test]
    fn test_to_absolute_tolerates_trailing_slash_on_origin() {
        assert_eq!(
            to_absolute(Some("http://localhost:8080/"), "translations/de.json"),
            "http://localhost:8080/translations/de.json"
        );
    }

    // ==================== is_passthrough Tests ====================

    #[test]
    fn test_is_passthrough() {
        assert!(is_passthrough("http://example.com/en.json"));
        assert!(is_passthrough("https://example.com/en.json"));
        assert!(is_passthrough("/modules/clock/translations/en.json"));
        assert!(!is_passthrough("translations/en.json"));
        assert!(!is_passthrough("./translations/en.json"));
    }
}
