use crate::i18n::Locale;
use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Frontend
    pub frontend_url: String,

    // Drupal backend
    pub backend_url: String,
    pub jsonapi_prefix: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Per-request backend timeout; unset or `0` means none
    pub backend_timeout: Option<Duration>,

    // Locales
    pub locales: Vec<Locale>,
    pub default_locale: Locale,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Frontend origin, accepting the Next.js-style name for existing deployments
        let frontend_url = std::env::var("FRONTEND_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_FRONTEND_URL"))
            .context("FRONTEND_URL not set")?;

        let backend_url = std::env::var("BACKEND_URL").context("BACKEND_URL not set")?;

        let locales = parse_locales(
            &std::env::var("LOCALES").unwrap_or_else(|_| "en".to_string()),
        )?;

        let default_locale = match std::env::var("DEFAULT_LOCALE") {
            Ok(code) => {
                let locale = Locale::parse(&code).context("Invalid DEFAULT_LOCALE")?;
                if !locales.contains(&locale) {
                    bail!(
                        "DEFAULT_LOCALE '{}' is not one of LOCALES ({})",
                        locale,
                        join_locales(&locales)
                    );
                }
                locale
            }
            // parse_locales guarantees at least one entry
            Err(_) => locales[0].clone(),
        };

        Ok(Self {
            frontend_url,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            jsonapi_prefix: std::env::var("JSONAPI_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|_| "jsonapi".to_string()),
            client_id: non_empty_var("CLIENT_ID"),
            client_secret: non_empty_var("CLIENT_SECRET"),
            backend_timeout: std::env::var("BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs),
            locales,
            default_locale,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        })
    }

    /// Client credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

/// Parse a comma-separated locale list, keeping the configured order.
pub fn parse_locales(raw: &str) -> Result<Vec<Locale>> {
    let mut locales: Vec<Locale> = Vec::new();

    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let locale = Locale::parse(code)
            .with_context(|| format!("Invalid locale in LOCALES: '{}'", code))?;
        if locales.contains(&locale) {
            bail!("Duplicate locale in LOCALES: '{}'", locale);
        }
        locales.push(locale);
    }

    if locales.is_empty() {
        bail!("LOCALES must name at least one locale");
    }

    Ok(locales)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn join_locales(locales: &[Locale]) -> String {
    locales
        .iter()
        .map(Locale::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
