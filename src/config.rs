use anyhow::{Context, Result};

/// Default base URL of the localization platform API
pub const DEFAULT_CROWDIN_API_URL: &str = "https://api.crowdin.com/api/v2";

/// File holding the front-end strings on the localization platform
pub const DEFAULT_FILE_ID: u64 = 6;

/// Page size cap for a single translations request
pub const DEFAULT_PAGE_LIMIT: u32 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    // Localization platform
    pub crowdin_api_key: String,
    pub crowdin_project_id: u64,
    pub crowdin_api_url: String,
    pub crowdin_file_id: u64,
    pub translations_page_limit: u32,

    // Persisted preferences
    pub preferences_file: String,

    // HTTP API
    pub api_key: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("CROWDIN_PROJECTID").context("CROWDIN_PROJECTID not set")?;

        Ok(Self {
            // Localization platform
            crowdin_api_key: std::env::var("CROWDIN_APIKEY").context("CROWDIN_APIKEY not set")?,
            crowdin_project_id: project_id
                .trim()
                .parse()
                .with_context(|| format!("CROWDIN_PROJECTID is not numeric: {:?}", project_id))?,
            crowdin_api_url: std::env::var("CROWDIN_API_URL")
                .unwrap_or_else(|_| DEFAULT_CROWDIN_API_URL.to_string()),
            crowdin_file_id: std::env::var("CROWDIN_FILE_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FILE_ID),
            translations_page_limit: std::env::var("TRANSLATIONS_PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_LIMIT),

            // Persisted preferences
            preferences_file: std::env::var("PREFERENCES_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),

            // HTTP API
            api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
