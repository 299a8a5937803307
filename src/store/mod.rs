//! Content store: fetches typed content objects from the headless backend.
//!
//! - `ContentStore`: the seam the page talks to (one instance per locale)
//! - `DrupalStore`: JSON:API implementation with a response cache
//! - `StoreRegistry`: locale → store lookup, built once at startup
//! - `ResponseHints`: request-scoped collector for cache headers

mod drupal;
mod jsonapi;

pub use drupal::DrupalStore;
pub use jsonapi::flatten_document;

use crate::error::{PageError, StoreError};
use crate::i18n::Locale;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// A request for one content object (or collection) by object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRequest {
    /// Object class such as `node--article`
    pub object_name: String,
    /// Bypass any cached copy
    pub refresh: bool,
    /// Fetch without authentication
    pub anon: bool,
    /// Raw query string, e.g. `include=field_media_image`
    pub params: Option<String>,
}

impl ObjectRequest {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            refresh: false,
            anon: false,
            params: None,
        }
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn anon(mut self, anon: bool) -> Self {
        self.anon = anon;
        self
    }

    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Key under which a result is cached.
    ///
    /// Anonymous and authenticated results never share an entry.
    pub fn cache_key(&self) -> String {
        let mode = if self.anon { "anon" } else { "auth" };
        match &self.params {
            Some(params) => format!("{}|{}?{}", mode, self.object_name, params),
            None => format!("{}|{}", mode, self.object_name),
        }
    }
}

/// Fetches content objects for a single locale.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch an object or collection.
    ///
    /// Returns `Ok(None)` when the backend has no data for the request.
    async fn get_object(
        &self,
        request: &ObjectRequest,
        response: &ResponseHints,
    ) -> Result<Option<Value>, StoreError>;
}

/// Request-scoped response metadata gathered while fetching content.
///
/// Stores record the backend's `Surrogate-Key` values here so the page
/// response can carry them for CDN purging.
#[derive(Debug, Default)]
pub struct ResponseHints {
    surrogate_keys: Mutex<BTreeSet<String>>,
}

impl ResponseHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a space-separated `Surrogate-Key` header value.
    pub fn add_surrogate_keys(&self, header: &str) {
        let mut keys = self
            .surrogate_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        keys.extend(header.split_whitespace().map(str::to_string));
    }

    /// Merged keys, de-duplicated and sorted, or `None` when nothing was recorded.
    pub fn surrogate_key_header(&self) -> Option<String> {
        let keys = self
            .surrogate_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if keys.is_empty() {
            None
        } else {
            Some(keys.iter().cloned().collect::<Vec<_>>().join(" "))
        }
    }
}

/// Per-locale content stores.
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct StoreRegistry {
    stores: HashMap<Locale, Arc<dyn ContentStore>>,
    default_locale: Locale,
}

impl StoreRegistry {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            stores: HashMap::new(),
            default_locale,
        }
    }

    pub fn with_store(mut self, locale: Locale, store: Arc<dyn ContentStore>) -> Self {
        self.stores.insert(locale, store);
        self
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Look up the store for a locale, falling back to the default locale
    /// when none is given.
    pub fn store_for(&self, locale: Option<&Locale>) -> Result<&Arc<dyn ContentStore>, PageError> {
        let locale = locale.unwrap_or(&self.default_locale);
        self.stores
            .get(locale)
            .ok_or_else(|| PageError::UnknownLocale(locale.to_string()))
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut locales: Vec<&str> = self.stores.keys().map(Locale::as_str).collect();
        locales.sort_unstable();
        f.debug_struct("StoreRegistry")
            .field("locales", &locales)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}
