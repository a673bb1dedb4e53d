pub mod config;
pub mod error;
pub mod fetch;
pub mod i18n;
pub mod locator;
pub mod module;
pub mod retry;
pub mod translator;

pub use error::{FetchError, ManifestError};
pub use fetch::{Fetcher, FsFetcher, HttpFetcher};
pub use i18n::{LanguageManifest, Variables};
pub use module::{redraw_channel, RedrawRequest, StaticModule, TranslatableModule};
pub use translator::{ModuleTranslationRegistration, TranslationMap, Translator, TranslatorBuilder};
