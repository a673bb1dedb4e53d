//! Fetching translation resources.
//!
//! A `Fetcher` turns a locator into parsed JSON. The loading helpers on top
//! of it never fail: every error degrades to an empty map and a warning.

use crate::error::{json_kind, FetchError};
use crate::i18n::TranslationMetrics;
use crate::retry::retry_once_while;
use crate::translator::TranslationMap;
use futures::future::BoxFuture;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Url;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of translation resources.
pub trait Fetcher: Send + Sync {
    /// Fetch and parse the JSON document at `locator`.
    fn fetch_json(&self, locator: &str) -> BoxFuture<'static, Result<Value, FetchError>>;
}

/// Fetches resources over HTTP, bypassing caches.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative and root-relative locators against `base`.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, FetchError> {
        let mut url =
            Url::parse(base).map_err(|_| FetchError::InvalidLocator(base.to_string()))?;
        // Keep the last path segment when joining relative locators
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    fn resolve(&self, locator: &str) -> Result<Url, FetchError> {
        if let Ok(url) = Url::parse(locator) {
            return Ok(url);
        }
        self.base_url
            .as_ref()
            .and_then(|base| base.join(locator).ok())
            .ok_or_else(|| FetchError::InvalidLocator(locator.to_string()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, locator: &str) -> BoxFuture<'static, Result<Value, FetchError>> {
        let client = self.client.clone();
        let url = self.resolve(locator);
        let locator = locator.to_string();

        Box::pin(async move {
            let url = url?;
            let response = client
                .get(url)
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache")
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    status: response.status().as_u16(),
                    locator,
                });
            }

            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        })
    }
}

/// Reads resources from a directory, treating locators as paths below it.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, locator: &str) -> Result<PathBuf, FetchError> {
        if locator.contains("://") {
            return Err(FetchError::InvalidLocator(locator.to_string()));
        }
        Ok(self.root.join(locator.trim_start_matches('/')))
    }
}

impl Fetcher for FsFetcher {
    fn fetch_json(&self, locator: &str) -> BoxFuture<'static, Result<Value, FetchError>> {
        let path = self.resolve(locator);

        Box::pin(async move {
            let path = path?;
            let content = tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Ok(serde_json::from_slice(&content)?)
        })
    }
}

/// Fetch one resource as a translation map, degrading failures to `{}`.
pub async fn fetch_translation_map(
    fetcher: &dyn Fetcher,
    locator: &str,
    metrics: &TranslationMetrics,
) -> TranslationMap {
    metrics.record_fetch();

    let result = fetcher.fetch_json(locator).await.and_then(|value| match value {
        Value::Object(map) => Ok(map),
        other => Err(FetchError::NotAnObject(json_kind(&other))),
    });

    match result {
        Ok(map) => map,
        Err(e) => {
            metrics.record_fetch_failure();
            warn!("Translator fetch failed for {}: {}", locator, e);
            TranslationMap::new()
        }
    }
}

/// Fetch a resource, asking exactly once more if it comes back empty.
pub async fn load_translation_map(
    fetcher: &dyn Fetcher,
    locator: &str,
    metrics: &TranslationMetrics,
) -> TranslationMap {
    let mut attempt = 0u32;
    let map = retry_once_while(
        &format!("Translation {}", locator),
        move || {
            if attempt > 0 {
                metrics.record_empty_retry();
            }
            attempt += 1;
            fetch_translation_map(fetcher, locator, metrics)
        },
        |map: &TranslationMap| map.is_empty(),
    )
    .await;

    debug!("Loaded {} translation keys from {}", map.len(), locator);
    map
}
