//! Client for the localization platform's string-translations API.

use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while listing translations.
#[derive(Debug, Error)]
pub enum CrowdinError {
    /// Network failure, timeout or TLS error before a response arrived.
    #[error("request to translation API failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("translation API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The body was not the expected JSON shape.
    #[error("failed to parse translation API response: {0}")]
    Decode(String),
}

/// One localized string as returned by the platform.
///
/// The shell does not interpret entries; unknown fields are kept so they can
/// be handed to the front end untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub string_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TranslationEntry {
    /// Plain-text entry, mostly useful for fixtures.
    pub fn text(string_id: u64, text: &str) -> Self {
        Self {
            string_id,
            content_type: Some("text/plain".to_string()),
            translation_id: None,
            text: Some(text.to_string()),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<ResponseItem>,
}

#[derive(Debug, Deserialize)]
struct ResponseItem {
    data: TranslationEntry,
}

/// Source of translations for a project file.
///
/// Implemented by [`StringTranslations`] against the real platform and by
/// test doubles elsewhere.
#[async_trait]
pub trait TranslationSource: Send + Sync + 'static {
    async fn list_language_translations(
        &self,
        project_id: u64,
        language_id: &str,
        file_id: u64,
        limit: u32,
    ) -> Result<Vec<TranslationEntry>, CrowdinError>;
}

/// HTTP client for the string-translations endpoint.
#[derive(Debug, Clone)]
pub struct StringTranslations {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl StringTranslations {
    pub fn new(client: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, &config.crowdin_api_url, &config.crowdin_api_key)
    }
}

#[async_trait]
impl TranslationSource for StringTranslations {
    async fn list_language_translations(
        &self,
        project_id: u64,
        language_id: &str,
        file_id: u64,
        limit: u32,
    ) -> Result<Vec<TranslationEntry>, CrowdinError> {
        let url = format!(
            "{}/projects/{}/languages/{}/translations",
            self.api_url, project_id, language_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("fileId", file_id.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(CrowdinError::Api { status, body });
        }

        let body = response.text().await?;
        let list: ListResponse =
            serde_json::from_str(&body).map_err(|e| CrowdinError::Decode(e.to_string()))?;

        Ok(list.data.into_iter().map(|item| item.data).collect())
    }
}
