//! Multi-language detection and href-lang alternate links.

use crate::i18n::Locale;
use serde::Serialize;

/// An alternate-language link advertised to search engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrefLang {
    pub href_lang: Locale,
    pub href: String,
}

/// More than one configured locale means the site runs in multi-language mode.
pub fn is_multi_language(locales: &[Locale]) -> bool {
    locales.len() > 1
}

/// One alternate per configured locale, pointing at that locale's site root.
///
/// The origin is used verbatim; a trailing slash on it is not normalised.
pub fn build_href_lang(origin: &str, locales: &[Locale]) -> Vec<HrefLang> {
    locales
        .iter()
        .map(|locale| HrefLang {
            href_lang: locale.clone(),
            href: format!("{}/{}", origin, locale),
        })
        .collect()
}
