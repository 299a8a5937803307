//! Server-rendered article listing for a decoupled Drupal site.
//!
//! A request to `/articles` (or `/{locale}/articles`) fetches the article
//! collection and main menu from Drupal's JSON:API, sorts the articles by
//! their `changed` date and renders an HTML page with per-locale alternate
//! links. Any failure along the way results in a 404 page.

pub mod config;
pub mod error;
pub mod i18n;
pub mod page;
pub mod render;
pub mod server;
pub mod sort;
pub mod store;
