//! HTTP API of the shell.
//!
//! Exposes the locale context, language changes and route resolution to the
//! browser front end.

use crate::bootstrap::LanguageBootstrapper;
use crate::config::Config;
use crate::i18n::{Language, TranslationMetrics};
use crate::routes::{Location, RouteTable};
use crate::security::is_authorized;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

type ApiError = (StatusCode, Json<Value>);

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<LanguageBootstrapper>,
    pub routes: Arc<RouteTable>,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(shell: Arc<LanguageBootstrapper>, api_key: Option<String>) -> Self {
        Self {
            shell,
            routes: Arc::new(RouteTable::new()),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LanguageChange {
    code: String,
}

#[derive(Debug, Deserialize)]
struct TranslationsParams {
    #[serde(default)]
    legacy: bool,
}

#[derive(Debug, Deserialize)]
struct RouteParams {
    path: String,
    #[serde(default)]
    follow: bool,
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// `GET /api/health`
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/languages`: every supported language, picker order.
async fn languages() -> Json<Value> {
    Json(json!({
        "default": Language::DEFAULT.code(),
        "languages": Language::all(),
    }))
}

/// `GET /api/language`: current selection without the strings.
async fn current_language(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.shell.snapshot();
    Json(json!({
        "phase": snapshot.phase,
        "selected": snapshot.selected,
        "translated": snapshot.translated,
        "generation": snapshot.generation,
        "settled_at": snapshot.settled_at,
    }))
}

/// `PUT /api/language`: select a language; the fetch runs in the background.
async fn change_language(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(change): Json<LanguageChange>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if !is_authorized(authorization, state.api_key.as_deref()) {
        return Err(error(StatusCode::UNAUTHORIZED, "invalid or missing API key"));
    }

    let language = Language::find(&change.code).ok_or_else(|| {
        error(
            StatusCode::BAD_REQUEST,
            format!("unsupported language code: {}", change.code),
        )
    })?;

    let fetching = state.shell.select_language(language).is_some();
    let snapshot = state.shell.snapshot();

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "selected": snapshot.selected,
            "generation": snapshot.generation,
            "fetching": fetching,
        })),
    ))
}

/// `GET /api/translations[?legacy=true]`
async fn translations(
    State(state): State<AppState>,
    Query(params): Query<TranslationsParams>,
) -> Json<Value> {
    let snapshot = state.shell.snapshot();

    if params.legacy {
        return Json(snapshot.translations.legacy_sequence());
    }

    Json(json!({
        "selected": snapshot.selected,
        "translated": snapshot.translated,
        "translations": snapshot.translations,
    }))
}

/// `GET /api/route?path=...[&follow=true]`
async fn resolve_route(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<Value>, ApiError> {
    let location = Location::parse(&params.path);

    if !params.follow {
        return Ok(Json(json!(state.routes.resolve(&location))));
    }

    let hops = state
        .routes
        .navigate(&location)
        .map_err(|e| error(StatusCode::LOOP_DETECTED, e.to_string()))?;
    Ok(Json(json!({ "hops": hops })))
}

/// `GET /api/metrics`
async fn metrics() -> Json<Value> {
    Json(json!(TranslationMetrics::global().report()))
}

/// Build the axum router with shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/language", get(current_language).put(change_language))
        .route("/api/translations", get(translations))
        .route("/api/route", get(resolve_route))
        .route("/api/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured port and serve until Ctrl-C.
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("API server error")
}
