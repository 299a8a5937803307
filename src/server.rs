//! HTTP routes for the article listing.

use crate::config::Config;
use crate::i18n::Locale;
use crate::page::{load_article_list, PageOutcome, RequestContext};
use crate::render::{render_article_list, render_not_found, ViewContext};
use crate::store::{DrupalStore, ResponseHints, StoreRegistry};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, read-only state built once at startup.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub stores: StoreRegistry,
}

impl AppState {
    pub fn new(config: Config, stores: StoreRegistry) -> Self {
        Self { config, stores }
    }

    /// Build one Drupal store per configured locale.
    pub fn from_config(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.backend_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let stores = config
            .locales
            .iter()
            .fold(StoreRegistry::new(config.default_locale.clone()), |registry, locale| {
                let store = DrupalStore::from_config(&config, client.clone(), locale);
                info!("Content store for '{}' at {}", locale, store.api_root());
                registry.with_store(locale.clone(), Arc::new(store))
            });

        Ok(Self::new(config, stores))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/articles", get(default_locale_articles))
        .route("/:locale/articles", get(localized_articles))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn default_locale_articles(State(state): State<Arc<AppState>>) -> Response {
    let locale = state.stores.default_locale().clone();
    article_list(&state, &locale).await
}

async fn localized_articles(
    State(state): State<Arc<AppState>>,
    Path(locale): Path<String>,
) -> Response {
    match Locale::parse(&locale) {
        Ok(locale) if state.config.locales.contains(&locale) => {
            article_list(&state, &locale).await
        }
        _ => {
            warn!("Request for unconfigured locale '{}'", locale);
            not_found_page(state.stores.default_locale())
        }
    }
}

async fn article_list(state: &AppState, locale: &Locale) -> Response {
    let hints = ResponseHints::new();
    let ctx = RequestContext {
        locale: Some(locale),
        locales: &state.config.locales,
        response: &hints,
    };

    let outcome = load_article_list(ctx, &state.stores, &state.config.frontend_url).await;
    let mut response = match outcome {
        PageOutcome::Props(props) => {
            let view = ViewContext {
                locale,
                asset_origin: &state.config.backend_url,
            };
            Html(render_article_list(&props, &view)).into_response()
        }
        PageOutcome::NotFound => not_found_page(locale),
    };

    if let Some(keys) = hints.surrogate_key_header() {
        match HeaderValue::from_str(&keys) {
            Ok(value) => {
                response.headers_mut().insert("surrogate-key", value);
            }
            Err(e) => warn!("Dropping invalid Surrogate-Key header: {}", e),
        }
    }
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    response
}

async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    not_found_page(state.stores.default_locale())
}

fn not_found_page(locale: &Locale) -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found(locale))).into_response()
}
