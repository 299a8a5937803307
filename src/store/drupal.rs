use crate::config::Config;
use crate::error::StoreError;
use crate::i18n::Locale;
use crate::store::{flatten_document, ContentStore, ObjectRequest, ResponseHints};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Tokens are refreshed this long before they actually expire.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// JSON:API client for one Drupal locale.
///
/// Results are cached per auth mode, object name and query string. A request with
/// `refresh` set always goes to the backend and replaces the cached copy.
pub struct DrupalStore {
    client: reqwest::Client,
    base_url: String,
    api_root: String,
    credentials: Option<(String, String)>,
    cache: Mutex<HashMap<String, Option<Value>>>,
    token: Mutex<Option<AccessToken>>,
}

impl DrupalStore {
    /// Create a store rooted at `{base_url}[/{locale}]/{prefix}`.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        locale: Option<&Locale>,
        prefix: &str,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let prefix = prefix.trim_matches('/');
        let api_root = match locale {
            Some(locale) => format!("{}/{}/{}", base_url, locale, prefix),
            None => format!("{}/{}", base_url, prefix),
        };

        Self {
            client,
            base_url,
            api_root,
            credentials: None,
            cache: Mutex::new(HashMap::new()),
            token: Mutex::new(None),
        }
    }

    /// Create the store for `locale` from configuration.
    ///
    /// The locale only becomes a path segment when more than one locale is
    /// configured, matching how Drupal prefixes translated JSON:API routes.
    pub fn from_config(config: &Config, client: reqwest::Client, locale: &Locale) -> Self {
        let path_locale = (config.locales.len() > 1).then_some(locale);
        let store = Self::new(client, &config.backend_url, path_locale, &config.jsonapi_prefix);

        match config.credentials() {
            Some((id, secret)) => store.with_credentials(id, secret),
            None => store,
        }
    }

    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.credentials = Some((client_id.into(), client_secret.into()));
        self
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// `node--article` maps to `{api_root}/node/article`.
    fn object_url(&self, request: &ObjectRequest) -> Result<String, StoreError> {
        let (entity, bundle) = request
            .object_name
            .split_once("--")
            .filter(|(entity, bundle)| !entity.is_empty() && !bundle.is_empty())
            .ok_or_else(|| StoreError::InvalidObjectName(request.object_name.clone()))?;

        let mut url = format!("{}/{}/{}", self.api_root, entity, bundle);
        if let Some(params) = request.params.as_deref().map(|p| p.trim_start_matches('?')) {
            if !params.is_empty() {
                url.push('?');
                url.push_str(params);
            }
        }
        Ok(url)
    }

    fn cached(&self, key: &str) -> Option<Option<Value>> {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(key).cloned()
    }

    fn store_cached(&self, key: String, value: Option<Value>) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(key, value);
    }

    /// Bearer token for authenticated requests, or `None` without credentials.
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        let Some((client_id, client_secret)) = &self.credentials else {
            return Ok(None);
        };

        {
            let token = self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(token) = token.as_ref().filter(|t| t.expires_at > Utc::now()) {
                return Ok(Some(token.value.clone()));
            }
        }

        let url = format!("{}/oauth/token", self.base_url);
        debug!("Requesting access token from {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Auth(format!("token request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Auth(format!("invalid token response: {}", e)))?;

        let lifetime = token.expires_in.unwrap_or(300) - TOKEN_EXPIRY_MARGIN_SECS;
        let cached = AccessToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime.max(0)),
        };
        *self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(cached);

        Ok(Some(token.access_token))
    }
}

impl std::fmt::Debug for DrupalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrupalStore")
            .field("api_root", &self.api_root)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

#[async_trait]
impl ContentStore for DrupalStore {
    async fn get_object(
        &self,
        request: &ObjectRequest,
        response: &ResponseHints,
    ) -> Result<Option<Value>, StoreError> {
        let key = request.cache_key();

        if !request.refresh {
            if let Some(cached) = self.cached(&key) {
                debug!("Serving {} from cache", key);
                return Ok(cached);
            }
        }

        let url = self.object_url(request)?;
        let mut builder = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.api+json");

        if !request.anon {
            if let Some(token) = self.access_token().await? {
                builder = builder.bearer_auth(token);
            }
        }

        let resp = builder.send().await.map_err(|source| StoreError::Transport {
            url: url.clone(),
            source,
        })?;

        if let Some(keys) = resp
            .headers()
            .get("surrogate-key")
            .and_then(|v| v.to_str().ok())
        {
            response.add_surrogate_keys(keys);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status { url, status, body });
        }

        let document: Value = resp.json().await.map_err(|e| StoreError::Malformed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let flattened = flatten_document(&document)
            .map_err(|reason| StoreError::Malformed { url: url.clone(), reason })?;

        let resource_count = match &flattened {
            Some(Value::Array(items)) => items.len(),
            Some(_) => 1,
            None => 0,
        };
        info!(
            "Fetched {} ({} resources) from {}",
            request.object_name, resource_count, url
        );

        self.store_cached(key, flattened.clone());
        Ok(flattened)
    }
}
