use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use swap_shell::bootstrap::{LanguageBootstrapper, TranslationQuery};
use swap_shell::config::Config;
use swap_shell::crowdin::StringTranslations;
use swap_shell::preferences::FilePreferences;
use swap_shell::server::{self, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("swap_shell=info".parse()?),
        )
        .init();

    info!("Starting swap shell");

    // Load configuration from environment
    let config = Config::from_env()?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let source = Arc::new(StringTranslations::from_config(client, &config));
    let preferences = Arc::new(FilePreferences::new(&config.preferences_file));
    info!("Language preference stored in {}", preferences.path().display());

    let shell = LanguageBootstrapper::new(
        source,
        preferences,
        TranslationQuery::from_config(&config),
    );

    // The first fetch runs in the background while the server comes up
    let _ = shell.initialize();

    server::serve(&config, AppState::new(shell, config.api_key.clone())).await
}
