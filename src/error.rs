//! Error types for content fetching and page data acquisition.
//!
//! Every `PageError` ends up as the same 404 for the visitor; the variants
//! exist so the log line says what actually went wrong.

use thiserror::Error;

/// Failure talking to the content backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid object name '{0}', expected '<entity>--<bundle>'")]
    InvalidObjectName(String),

    #[error("Failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Content backend error ({status}) for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid JSON:API document from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Authentication with content backend failed: {0}")]
    Auth(String),
}

/// Failure acquiring the data for a page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("No {object_name} returned. Make sure the objectName and params are valid!")]
    EmptyResult { object_name: String },

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("Unexpected shape for {object_name}: {reason}")]
    Malformed { object_name: String, reason: String },

    #[error(transparent)]
    Backend(#[from] StoreError),
}
