//! Internationalization (i18n) building blocks used by the translator.
//!
//! # Architecture
//!
//! - `manifest`: the ordered table of languages and their resource locators
//! - `template`: `{placeholder}` rendering for resolved translations
//! - `validator`: key parity checks between translation resources
//! - `metrics`: loading and resolution counters
//!
//! # Example
//!
//! ```rust,ignore
//! use mirror_translator::i18n::LanguageManifest;
//!
//! let manifest = LanguageManifest::new([("en", "translations/en.json"), ("de", "translations/de.json")]);
//! let selection = manifest.select_core("de");
//! assert_eq!(selection.fallback.as_deref(), Some("en"));
//! ```

mod manifest;
mod metrics;
mod template;
mod validator;

pub use manifest::{CoreSelection, LanguageManifest, ModuleFiles, DEFAULT_BASE_LANGUAGE};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use template::{has_placeholders, render, render_str, Variables, FALLBACK_VARIABLE};
pub use validator::{KeyParityValidator, ValidationReport};
