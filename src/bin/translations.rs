//! Translations binary - fetches the strings for one language and prints them
//!
//! Usage:
//!   cargo run --bin translations -- fr            # Tagged result as JSON
//!   cargo run --bin translations -- fr --legacy   # Flat sequence, ["error"] when unavailable
//!   cargo run --bin translations -- --list        # Supported language codes
//!
//! Required environment variables:
//! - CROWDIN_APIKEY
//! - CROWDIN_PROJECTID
//!
//! Optional:
//! - CROWDIN_API_URL (defaults to https://api.crowdin.com/api/v2)
//! - CROWDIN_FILE_ID (defaults to 6)
//! - TRANSLATIONS_PAGE_LIMIT (defaults to 200)
//!
//! The stored language preference is neither read nor written.

use anyhow::{Context, Result};
use std::sync::Arc;
use swap_shell::bootstrap::{LanguageBootstrapper, Phase, TranslationQuery};
use swap_shell::config::Config;
use swap_shell::crowdin::StringTranslations;
use swap_shell::i18n::Language;
use swap_shell::preferences::MemoryPreferences;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("swap_shell=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--list") {
        for language in Language::all() {
            println!("{:<6} {}", language.code(), language.name());
        }
        return Ok(());
    }

    let legacy = args.iter().any(|a| a == "--legacy");
    let code = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or(Language::DEFAULT.code());
    let language = Language::from_code(code)?;

    let config = Config::from_env()?;
    let source = Arc::new(StringTranslations::from_config(reqwest::Client::new(), &config));
    let shell = LanguageBootstrapper::new(
        source,
        Arc::new(MemoryPreferences::new()),
        TranslationQuery::from_config(&config),
    );

    info!("Fetching translations for {}", language);
    if let Some(fetch) = shell.select_language(language) {
        fetch.await.context("Translation fetch task panicked")?;
    }

    let state = shell.snapshot();
    debug_assert_eq!(state.phase, Phase::Settled);

    let output = if legacy {
        serde_json::to_string_pretty(&state.translations.legacy_sequence())?
    } else {
        serde_json::to_string_pretty(&state.translations)?
    };
    println!("{}", output);

    if state.translations.is_unavailable() {
        std::process::exit(1);
    }

    Ok(())
}
