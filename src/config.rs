use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::i18n::DEFAULT_BASE_LANGUAGE;

#[derive(Debug, Clone)]
pub struct Config {
    // Languages
    pub language: String,
    pub base_language: String,

    // Resources
    pub manifest_path: PathBuf,
    pub translations_root: PathBuf,
    pub origin: Option<String>,
    pub fetch_timeout: Duration,

    // Optional module to register
    pub module_name: Option<String>,
    pub module_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Languages
            language: std::env::var("TRANSLATOR_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_BASE_LANGUAGE.to_string()),
            base_language: std::env::var("TRANSLATOR_BASE_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_BASE_LANGUAGE.to_string()),

            // Resources
            manifest_path: std::env::var("TRANSLATIONS_MANIFEST")
                .unwrap_or_else(|_| "translations/translations.json".to_string())
                .into(),
            translations_root: std::env::var("TRANSLATIONS_ROOT")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
            origin: std::env::var("TRANSLATOR_ORIGIN")
                .ok()
                .filter(|v| !v.is_empty()),
            fetch_timeout: Duration::from_secs(
                match std::env::var("TRANSLATOR_FETCH_TIMEOUT_SECS") {
                    Ok(v) => v
                        .parse()
                        .context("TRANSLATOR_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
                    Err(_) => 10,
                },
            ),

            // Module
            module_name: std::env::var("TRANSLATOR_MODULE_NAME")
                .ok()
                .filter(|v| !v.is_empty()),
            module_path: std::env::var("TRANSLATOR_MODULE_PATH")
                .ok()
                .filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "TRANSLATOR_LANGUAGE",
        "TRANSLATOR_BASE_LANGUAGE",
        "TRANSLATIONS_MANIFEST",
        "TRANSLATIONS_ROOT",
        "TRANSLATOR_ORIGIN",
        "TRANSLATOR_FETCH_TIMEOUT_SECS",
        "TRANSLATOR_MODULE_NAME",
        "TRANSLATOR_MODULE_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.language, "en");
        assert_eq!(config.base_language, "en");
        assert_eq!(
            config.manifest_path,
            PathBuf::from("translations/translations.json")
        );
        assert_eq!(config.translations_root, PathBuf::from("."));
        assert_eq!(config.origin, None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.module_name, None);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("TRANSLATOR_LANGUAGE", "de");
        std::env::set_var("TRANSLATOR_ORIGIN", "http://localhost:8080");
        std::env::set_var("TRANSLATOR_FETCH_TIMEOUT_SECS", "3");
        std::env::set_var("TRANSLATOR_MODULE_NAME", "clock");
        std::env::set_var("TRANSLATOR_MODULE_PATH", "modules/default/clock");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.language, "de");
        assert_eq!(config.origin.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.module_name.as_deref(), Some("clock"));
        assert_eq!(config.module_path.as_deref(), Some("modules/default/clock"));
    }

    #[test]
    #[serial]
    fn test_empty_origin_is_ignored() {
        clear_env();
        std::env::set_var("TRANSLATOR_ORIGIN", "");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.origin, None);
    }

    #[test]
    #[serial]
    fn test_invalid_timeout() {
        clear_env();
        std::env::set_var("TRANSLATOR_FETCH_TIMEOUT_SECS", "soon");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
