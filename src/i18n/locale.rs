//! Locale type: a validated language tag such as `en`, `es` or `pt-br`.

use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Language tag shape accepted for locales (primary subtag plus optional
/// region/script subtags).
static LOCALE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn locale_pattern() -> &'static Regex {
    LOCALE_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("locale pattern is valid")
    })
}

/// A validated locale tag.
///
/// Tags are kept exactly as configured, so `pt-br` and `pt-BR` are distinct
/// locales; the tag is also the URL path segment for that locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a Locale from a tag string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the tag is well-formed
    /// * `Err` if the tag is empty or not a language tag
    pub fn parse(tag: &str) -> Result<Locale> {
        let tag = tag.trim();

        if tag.is_empty() {
            bail!("Locale tag is empty");
        }
        if !locale_pattern().is_match(tag) {
            bail!("Invalid locale tag: '{}'", tag);
        }

        Ok(Locale(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
