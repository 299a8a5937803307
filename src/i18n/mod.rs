//! Locale handling for the article listing.
//!
//! Locales come from deployment configuration and the request path; this
//! module validates them and derives the per-locale SEO metadata.
//!
//! - `locale`: validated `Locale` tag type
//! - `alternates`: multi-language detection and href-lang alternate links
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{build_href_lang, is_multi_language, Locale};
//!
//! let locales = vec![Locale::parse("en")?, Locale::parse("es")?];
//! assert!(is_multi_language(&locales));
//!
//! let alternates = build_href_lang("https://www.example.com", &locales);
//! assert_eq!(alternates[1].href, "https://www.example.com/es");
//! ```

mod alternates;
mod locale;

pub use alternates::{build_href_lang, is_multi_language, HrefLang};
pub use locale::Locale;
