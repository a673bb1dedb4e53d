//! Module capability consumed by the translator.
//!
//! A module is anything with a stable name that can resolve paths relative
//! to its own base location. Modules that can redraw themselves are told
//! about finished loads through `RedrawRequest` messages.

use tokio::sync::mpsc;

/// Narrow view of a dashboard module.
pub trait TranslatableModule: Send + Sync {
    /// Stable identity used to key the module's translation tiers.
    fn name(&self) -> &str;

    /// Resolve `path` relative to the module's base location.
    fn file(&self, path: &str) -> String;

    /// Whether the module wants a redraw once its translations arrive.
    fn supports_redraw(&self) -> bool {
        false
    }
}

/// Request to redraw a module after its translations changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pub module: String,
    /// Animation speed for the redraw, in milliseconds
    pub speed_ms: u64,
}

pub type RedrawSender = mpsc::UnboundedSender<RedrawRequest>;
pub type RedrawReceiver = mpsc::UnboundedReceiver<RedrawRequest>;

/// Create the channel that carries redraw requests to the rendering layer.
pub fn redraw_channel() -> (RedrawSender, RedrawReceiver) {
    mpsc::unbounded_channel()
}

/// A module identified by name and rooted at a base path or URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticModule {
    name: String,
    base: String,
    redraw: bool,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            redraw: true,
        }
    }

    /// Disable redraw requests for this module.
    pub fn without_redraw(mut self) -> Self {
        self.redraw = false;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl TranslatableModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self, path: &str) -> String {
        let base = self.base.trim_end_matches('/');
        let path = path.trim_start_matches("./");
        if base.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", base, path)
    }

    fn supports_redraw(&self) -> bool {
        self.redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_module_file_joins_base() {
        let module = StaticModule::new("clock", "modules/default/clock");
        assert_eq!(module.name(), "clock");
        assert_eq!(
            module.file("translations/de.json"),
            "modules/default/clock/translations/de.json"
        );
    }

    #[test]
    fn test_static_module_file_trims_slashes_and_dot() {
        let module = StaticModule::new("clock", "http://localhost:8080/modules/clock/");
        assert_eq!(
            module.file("./translations/de.json"),
            "http://localhost:8080/modules/clock/translations/de.json"
        );
    }

    #[test]
    fn test_static_module_empty_base() {
        let module = StaticModule::new("clock", "");
        assert_eq!(module.file("translations/de.json"), "translations/de.json");
    }

    #[test]
    fn test_static_module_redraw_flag() {
        assert!(StaticModule::new("a", "b").supports_redraw());
        assert!(!StaticModule::new("a", "b").without_redraw().supports_redraw());
    }

    #[tokio::test]
    async fn test_redraw_channel_delivers_requests() {
        let (tx, mut rx) = redraw_channel();
        tx.send(RedrawRequest {
            module: "clock".to_string(),
            speed_ms: 0,
        })
        .unwrap();

        let request = rx.recv().await.unwrap();
        assert_eq!(request.module, "clock");
        assert_eq!(request.speed_ms, 0);
    }
}
