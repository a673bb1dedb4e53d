//! Language manifest: the table of known languages and their resources.
//!
//! The manifest maps a language code to the locator of a JSON translation
//! file. Entry order is significant: when neither the requested language nor
//! the base language can serve as a fallback, the first entry is used.

use crate::error::ManifestError;
use serde_json::Value;
use std::path::Path;

/// Language used as the fallback for every other language.
pub const DEFAULT_BASE_LANGUAGE: &str = "en";

/// Ordered mapping from language code to translation resource locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageManifest {
    entries: Vec<(String, String)>,
    base_language: String,
}

/// Which manifest languages back the core translation tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSelection {
    /// The requested language, if the manifest knows it
    pub primary: Option<String>,

    /// Language consulted when a key is missing from the primary tier
    pub fallback: Option<String>,
}

/// Translation files a module declares for the configured language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFiles {
    pub primary: Option<String>,
    pub fallback: Option<String>,
}

impl LanguageManifest {
    /// Build a manifest from `(code, locator)` pairs, keeping their order.
    ///
    /// A code given twice keeps its first position and its last locator.
    pub fn new<I, C, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut manifest = Self {
            entries: Vec::new(),
            base_language: DEFAULT_BASE_LANGUAGE.to_string(),
        };
        for (code, locator) in entries {
            manifest.insert(code.into(), locator.into());
        }
        manifest
    }

    /// Override the base language (defaults to `en`).
    pub fn with_base_language(mut self, code: impl Into<String>) -> Self {
        self.base_language = code.into();
        self
    }

    /// Parse a manifest from a JSON object of `code: locator` entries.
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(ManifestError::InvalidEntry("<root>".to_string()));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (code, locator) in map {
            match locator {
                Value::String(locator) => entries.push((code, locator)),
                _ => return Err(ManifestError::InvalidEntry(code)),
            }
        }
        Ok(Self::new(entries))
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    fn insert(&mut self, code: String, locator: String) {
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = locator,
            None => self.entries.push((code, locator)),
        }
    }

    /// Locator for a language code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, locator)| locator.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Code of the first manifest entry.
    pub fn first_code(&self) -> Option<&str> {
        self.entries.first().map(|(code, _)| code.as_str())
    }

    /// All language codes in manifest order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn base_language(&self) -> &str {
        &self.base_language
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Choose the core primary and fallback languages for `lang`.
    ///
    /// The base language never gets a fallback. Other languages fall back to
    /// the base language when the manifest has it, else to the first entry
    /// that differs from `lang`.
    pub fn select_core(&self, lang: &str) -> CoreSelection {
        let primary = self.contains(lang).then(|| lang.to_string());

        let fallback = if primary.as_deref() == Some(self.base_language.as_str()) {
            None
        } else if self.contains(&self.base_language) {
            Some(self.base_language.clone())
        } else {
            self.first_code()
                .filter(|first| *first != lang)
                .map(str::to_string)
        };

        CoreSelection { primary, fallback }
    }

    /// Files a module should register for `lang`, treating this manifest as
    /// the module's own declared translation table.
    ///
    /// Returns `None` when the module declares no translations. The primary
    /// file is the (case-insensitive) match for `lang`; the fallback is always
    /// the first declared language.
    pub fn module_files(&self, lang: &str) -> Option<ModuleFiles> {
        let fallback = self.entries.first().map(|(_, locator)| locator.clone())?;
        let primary = self.get(&lang.to_lowercase()).map(str::to_string);
        Some(ModuleFiles {
            primary,
            fallback: Some(fallback),
        })
    }
}
