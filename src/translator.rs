//! Translation resolution and lazy loading.
//!
//! A `Translator` keeps four tiers of translations: core primary, core
//! fallback, and a primary and fallback map per module. Module resources are
//! registered up front and fetched in the background the first time the
//! module asks for a key. `translate` itself never waits on I/O; it answers
//! from whatever has been loaded so far and falls back to the raw key.

use crate::fetch::{load_translation_map, Fetcher};
use crate::i18n::{render, LanguageManifest, TranslationMetrics, Variables};
use crate::locator::{is_passthrough, to_absolute};
use crate::module::{RedrawRequest, RedrawSender, TranslatableModule};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::runtime::Handle;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Flat mapping from translation key to template (or pass-through value).
pub type TranslationMap = serde_json::Map<String, Value>;

/// Translation files declared by one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTranslationRegistration {
    pub primary: Option<String>,
    pub fallback: Option<String>,
    /// Set once the primary load has been started, not when it finished
    pub loaded_primary: bool,
    pub loaded_fallback: bool,
}

#[derive(Debug, Default)]
struct TranslatorState {
    core: Arc<TranslationMap>,
    core_fallback: Arc<TranslationMap>,
    modules: HashMap<String, Arc<TranslationMap>>,
    modules_fallback: HashMap<String, Arc<TranslationMap>>,
    registry: HashMap<String, ModuleTranslationRegistration>,
}

struct Inner {
    state: RwLock<TranslatorState>,
    fetcher: Arc<dyn Fetcher>,
    manifest: LanguageManifest,
    origin: Option<String>,
    redraw: Option<RedrawSender>,
    metrics: TranslationMetrics,
    prepared: OnceCell<()>,
}

/// Process-scoped translation context.
///
/// Cloning is cheap and every clone shares the same state, so the
/// composition root can hand copies to whoever renders modules.
#[derive(Clone)]
pub struct Translator {
    inner: Arc<Inner>,
}

/// Builder for [`Translator`].
pub struct TranslatorBuilder {
    fetcher: Arc<dyn Fetcher>,
    manifest: LanguageManifest,
    origin: Option<String>,
    redraw: Option<RedrawSender>,
}

impl TranslatorBuilder {
    /// Origin that relative core locators are resolved against.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Channel notified when a module's translations finish loading.
    pub fn redraw_sender(mut self, sender: RedrawSender) -> Self {
        self.redraw = Some(sender);
        self
    }

    pub fn build(self) -> Translator {
        Translator {
            inner: Arc::new(Inner {
                state: RwLock::new(TranslatorState::default()),
                fetcher: self.fetcher,
                manifest: self.manifest,
                origin: self.origin,
                redraw: self.redraw,
                metrics: TranslationMetrics::new(),
                prepared: OnceCell::new(),
            }),
        }
    }
}

impl Translator {
    pub fn builder(fetcher: Arc<dyn Fetcher>, manifest: LanguageManifest) -> TranslatorBuilder {
        TranslatorBuilder {
            fetcher,
            manifest,
            origin: None,
            redraw: None,
        }
    }

    pub fn new(fetcher: Arc<dyn Fetcher>, manifest: LanguageManifest) -> Self {
        Self::builder(fetcher, manifest).build()
    }

    fn read(&self) -> RwLockReadGuard<'_, TranslatorState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TranslatorState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Registration ====================

    /// Remember the translation files a module declared so they can be
    /// loaded on its first `translate` call.
    ///
    /// Registering the same module again resets its load flags.
    pub fn register_module_translation_files<M>(
        &self,
        module: &M,
        primary: Option<&str>,
        fallback: Option<&str>,
    ) where
        M: TranslatableModule + ?Sized,
    {
        debug!(
            "{} - Registered translations (primary: {:?}, fallback: {:?})",
            module.name(),
            primary,
            fallback
        );
        self.write().registry.insert(
            module.name().to_string(),
            ModuleTranslationRegistration {
                primary: primary.map(str::to_string),
                fallback: fallback.map(str::to_string),
                loaded_primary: false,
                loaded_fallback: false,
            },
        );
    }

    /// Register the files a module declares in its own language table.
    ///
    /// Returns `false` (and registers nothing) when the table is empty.
    pub fn register_declared_translations<M>(
        &self,
        module: &M,
        declared: &LanguageManifest,
        lang: &str,
    ) -> bool
    where
        M: TranslatableModule + ?Sized,
    {
        match declared.module_files(lang) {
            Some(files) => {
                self.register_module_translation_files(
                    module,
                    files.primary.as_deref(),
                    files.fallback.as_deref(),
                );
                true
            }
            None => false,
        }
    }

    pub fn registration(&self, module_name: &str) -> Option<ModuleTranslationRegistration> {
        self.read().registry.get(module_name).cloned()
    }

    // ==================== Resolution ====================

    /// Translate `key` for `module`, rendering `{placeholders}` from
    /// `variables`. Non-string values are rendered as compact JSON.
    pub fn translate<M>(&self, module: &Arc<M>, key: &str, variables: &Variables) -> String
    where
        M: TranslatableModule + ?Sized + 'static,
    {
        match self.translate_value(module, key, variables) {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }

    /// Like [`Translator::translate`], but non-string values are returned
    /// unchanged.
    ///
    /// Starts any pending background loads for the module without waiting
    /// for them. Resolution order: module primary, core primary, module
    /// fallback, core fallback. An unknown key is returned as-is.
    pub fn translate_value<M>(&self, module: &Arc<M>, key: &str, variables: &Variables) -> Value
    where
        M: TranslatableModule + ?Sized + 'static,
    {
        let name = module.name();
        if name.is_empty() {
            return self.resolve(None, key, variables);
        }

        self.trigger_pending_loads(module);
        self.resolve(Some(name), key, variables)
    }

    /// Translate against the core tiers only.
    pub fn translate_core(&self, key: &str, variables: &Variables) -> String {
        match self.resolve(None, key, variables) {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }

    fn resolve(&self, module_name: Option<&str>, key: &str, variables: &Variables) -> Value {
        let found = lookup(&self.read(), module_name, key);

        match found {
            Some(value) => {
                self.inner.metrics.record_resolved();
                render(&value, variables)
            }
            None => {
                self.inner.metrics.record_unresolved();
                Value::String(key.to_string())
            }
        }
    }

    // ==================== Lazy Loading ====================

    /// Start the module's pending loads in the background without
    /// resolving any key.
    pub fn preload<M>(&self, module: &Arc<M>)
    where
        M: TranslatableModule + ?Sized + 'static,
    {
        if !module.name().is_empty() {
            self.trigger_pending_loads(module);
        }
    }

    /// Claim the module's not-yet-started loads and spawn them.
    fn trigger_pending_loads<M>(&self, module: &Arc<M>)
    where
        M: TranslatableModule + ?Sized + 'static,
    {
        let name = module.name();

        let has_pending = match self.read().registry.get(name) {
            Some(reg) => has_pending_primary(reg) || has_pending_fallback(reg),
            None => false,
        };
        if !has_pending {
            return;
        }

        let pending = {
            let mut state = self.write();
            let Some(reg) = state.registry.get_mut(name) else {
                return;
            };
            let mut pending = Vec::with_capacity(2);
            if has_pending_primary(reg) {
                reg.loaded_primary = true;
                pending.extend(reg.primary.clone().map(|file| (file, false)));
            }
            if has_pending_fallback(reg) {
                reg.loaded_fallback = true;
                pending.extend(reg.fallback.clone().map(|file| (file, true)));
            }
            pending
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(
                    "{} - No async runtime available, translation load postponed",
                    name
                );
                self.release_claims(name, &pending);
                return;
            }
        };

        for (file, is_fallback) in pending {
            let locator = self.begin_load(module.as_ref(), Some(file.as_str()), is_fallback);
            let translator = self.clone();
            let module = Arc::clone(module);
            handle.spawn(async move {
                if let Some(locator) = locator {
                    translator
                        .complete_load(module.name(), &locator, is_fallback)
                        .await;
                }
                translator.request_redraw(module.as_ref());
            });
        }
    }

    fn release_claims(&self, name: &str, claimed: &[(String, bool)]) {
        let mut state = self.write();
        if let Some(reg) = state.registry.get_mut(name) {
            for (_, is_fallback) in claimed {
                if *is_fallback {
                    reg.loaded_fallback = false;
                } else {
                    reg.loaded_primary = false;
                }
            }
        }
    }

    fn request_redraw<M>(&self, module: &M)
    where
        M: TranslatableModule + ?Sized,
    {
        if !module.supports_redraw() {
            return;
        }
        if let Some(sender) = &self.inner.redraw {
            let request = RedrawRequest {
                module: module.name().to_string(),
                speed_ms: 0,
            };
            if sender.send(request).is_err() {
                debug!("{} - Redraw receiver closed", module.name());
            }
        }
    }

    /// Load a module translation file into the primary or fallback tier.
    ///
    /// Does nothing for a missing path, or once the module already has a
    /// fallback map. Relative paths are resolved by the module itself.
    pub async fn load<M>(&self, module: &M, file: Option<&str>, is_fallback: bool)
    where
        M: TranslatableModule + ?Sized,
    {
        if let Some(locator) = self.begin_load(module, file, is_fallback) {
            self.complete_load(module.name(), &locator, is_fallback)
                .await;
        }
    }

    /// Synchronous part of a load: the skip checks and locator resolution.
    fn begin_load<M>(&self, module: &M, file: Option<&str>, is_fallback: bool) -> Option<String>
    where
        M: TranslatableModule + ?Sized,
    {
        let name = module.name();
        info!(
            "{} - Load translation{}: {}",
            name,
            if is_fallback { " fallback" } else { "" },
            file.unwrap_or_default()
        );

        let file = file.filter(|file| !file.is_empty())?;
        if self.has_fallback_translations(name) {
            debug!("{} - Fallback translations present, skipping {}", name, file);
            return None;
        }

        if is_passthrough(file) {
            Some(file.to_string())
        } else {
            Some(module.file(file))
        }
    }

    async fn complete_load(&self, name: &str, locator: &str, is_fallback: bool) {
        let map = load_translation_map(
            self.inner.fetcher.as_ref(),
            locator,
            &self.inner.metrics,
        )
        .await;

        self.install_module_map(name, is_fallback, map);
    }

    fn has_fallback_translations(&self, name: &str) -> bool {
        self.read().modules_fallback.contains_key(name)
    }

    fn install_module_map(&self, name: &str, is_fallback: bool, map: TranslationMap) {
        let mut state = self.write();
        let tier = if is_fallback {
            &mut state.modules_fallback
        } else {
            &mut state.modules
        };
        tier.insert(name.to_string(), Arc::new(map));
    }

    // ==================== Core Translations ====================

    /// Load the core tiers for `lang` once; every caller awaits the same
    /// load, and later calls return immediately.
    pub async fn prepare(&self, lang: &str) {
        self.inner
            .prepared
            .get_or_init(|| self.load_core_translations(lang))
            .await;
    }

    pub fn is_prepared(&self) -> bool {
        self.inner.prepared.initialized()
    }

    /// Fetch and install the core primary and fallback translations.
    pub async fn load_core_translations(&self, lang: &str) {
        let manifest = &self.inner.manifest;
        let selection = manifest.select_core(lang);
        let origin = self.inner.origin.as_deref();

        let primary_path = match selection.primary.as_deref().and_then(|code| manifest.get(code)) {
            Some(path) => path.to_string(),
            None => format!("translations/{}.json", lang),
        };
        let primary = load_translation_map(
            self.inner.fetcher.as_ref(),
            &to_absolute(origin, &primary_path),
            &self.inner.metrics,
        )
        .await;
        let primary_keys = primary.len();
        if !primary.is_empty() {
            self.write().core = Arc::new(primary);
        }

        let fallback = selection
            .fallback
            .filter(|code| selection.primary.as_ref() != Some(code));
        let fallback_path = fallback.as_deref().and_then(|code| manifest.get(code));

        let fallback_keys = match fallback_path {
            None => {
                let mut state = self.write();
                let alias = Arc::clone(&state.core);
                let keys = alias.len();
                state.core_fallback = alias;
                keys
            }
            Some(path) => {
                let loaded = load_translation_map(
                    self.inner.fetcher.as_ref(),
                    &to_absolute(origin, path),
                            &self.inner.metrics,
                )
                .await;
                let keys = loaded.len();
                if !loaded.is_empty() {
                    self.write().core_fallback = Arc::new(loaded);
                }
                keys
            }
        };

        info!(
            "✓ Core translations for '{}' ready ({} keys, fallback {:?} with {} keys)",
            lang, primary_keys, fallback, fallback_keys
        );
    }

    // ==================== Introspection ====================

    pub fn core_translations(&self) -> Arc<TranslationMap> {
        Arc::clone(&self.read().core)
    }

    pub fn core_fallback_translations(&self) -> Arc<TranslationMap> {
        Arc::clone(&self.read().core_fallback)
    }

    pub fn module_translations(&self, module_name: &str) -> Option<Arc<TranslationMap>> {
        self.read().modules.get(module_name).cloned()
    }

    pub fn module_fallback_translations(&self, module_name: &str) -> Option<Arc<TranslationMap>> {
        self.read().modules_fallback.get(module_name).cloned()
    }

    pub fn manifest(&self) -> &LanguageManifest {
        &self.inner.manifest
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.inner.metrics
    }
}

fn lookup(state: &TranslatorState, module_name: Option<&str>, key: &str) -> Option<Value> {
    let sources = [
        module_name.and_then(|name| state.modules.get(name)),
        Some(&state.core),
        module_name.and_then(|name| state.modules_fallback.get(name)),
        Some(&state.core_fallback),
    ];
    sources
        .into_iter()
        .flatten()
        .find_map(|dict| dict.get(key))
        .cloned()
}

fn has_pending_primary(reg: &ModuleTranslationRegistration) -> bool {
    !reg.loaded_primary && reg.primary.as_deref().is_some_and(|file| !file.is_empty())
}

fn has_pending_fallback(reg: &ModuleTranslationRegistration) -> bool {
    !reg.loaded_fallback && reg.fallback.as_deref().is_some_and(|file| !file.is_empty())
}
