use anyhow::{Context, Result};
use mirror_translator::config::Config;
use mirror_translator::{
    redraw_channel, Fetcher, FsFetcher, HttpFetcher, LanguageManifest, StaticModule,
    TranslatableModule, Translator, Variables,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mirror_translator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let keys: Vec<String> = std::env::args().skip(1).collect();

    let manifest = LanguageManifest::from_file(&config.manifest_path)
        .with_context(|| {
            format!(
                "Failed to load language manifest {}",
                config.manifest_path.display()
            )
        })?
        .with_base_language(config.base_language.clone());
    info!(
        "Loaded manifest with {} languages (base: {})",
        manifest.len(),
        manifest.base_language()
    );

    let fetcher: Arc<dyn Fetcher> = match &config.origin {
        Some(origin) => Arc::new(
            HttpFetcher::new(config.fetch_timeout)?
                .with_base_url(origin)
                .with_context(|| format!("Invalid TRANSLATOR_ORIGIN: {}", origin))?,
        ),
        None => Arc::new(FsFetcher::new(&config.translations_root)),
    };

    let (redraw_tx, mut redraw_rx) = redraw_channel();
    let mut builder = Translator::builder(fetcher, manifest.clone()).redraw_sender(redraw_tx);
    if let Some(origin) = &config.origin {
        builder = builder.origin(origin.clone());
    }
    let translator = builder.build();

    info!("Preparing core translations for '{}'", config.language);
    translator.prepare(&config.language).await;

    let module = match (&config.module_name, &config.module_path) {
        (Some(name), Some(path)) => Some(Arc::new(StaticModule::new(name.clone(), path.clone()))),
        (Some(name), None) => {
            warn!("TRANSLATOR_MODULE_NAME={} set without TRANSLATOR_MODULE_PATH, ignoring", name);
            None
        }
        _ => None,
    };

    if let Some(module) = &module {
        let declared = LanguageManifest::new(
            manifest
                .codes()
                .map(|code| (code.to_string(), format!("translations/{}.json", code))),
        );
        if translator.register_declared_translations(module.as_ref(), &declared, &config.language) {
            let expected = translator
                .registration(module.name())
                .map(|reg| usize::from(reg.primary.is_some()) + usize::from(reg.fallback.is_some()))
                .unwrap_or(0);

            translator.preload(module);

            for _ in 0..expected {
                match tokio::time::timeout(config.fetch_timeout + Duration::from_secs(1), redraw_rx.recv())
                    .await
                {
                    Ok(Some(request)) => info!("✓ {} translations loaded", request.module),
                    Ok(None) => break,
                    Err(_) => {
                        warn!("Timed out waiting for module translations");
                        break;
                    }
                }
            }
        }
    }

    for key in &keys {
        let text = match &module {
            Some(module) => translator.translate(module, key, &Variables::new()),
            None => translator.translate_core(key, &Variables::new()),
        };
        println!("{} = {}", key, text);
    }

    info!(
        "Translation metrics: {}",
        serde_json::to_string(&translator.metrics().report())?
    );
    Ok(())
}
