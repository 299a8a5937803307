//! Article listing page: data acquisition.
//!
//! Runs once per request. Fetches the article collection and main menu for
//! the request's locale, sorts the articles newest first and bundles
//! everything the view needs. Any failure is logged and becomes a 404.

use crate::error::PageError;
use crate::i18n::{build_href_lang, is_multi_language, HrefLang, Locale};
use crate::sort::{sort_by_date, Direction};
use crate::store::{ObjectRequest, ResponseHints, StoreRegistry};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

pub const ARTICLE_OBJECT: &str = "node--article";
pub const ARTICLE_PARAMS: &str = "include=field_media_image.field_media_image";
pub const MENU_OBJECT: &str = "menu_items--main";

/// Routing information for one page request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Locale negotiated for this request, if any
    pub locale: Option<&'a Locale>,
    /// Every locale the deployment is configured for
    pub locales: &'a [Locale],
    /// Collector for response headers set by the content store
    pub response: &'a ResponseHints,
}

/// Everything the article listing view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListProps {
    pub sorted_articles: Vec<Value>,
    pub href_lang: Vec<HrefLang>,
    pub multi_language: bool,
    pub footer_menu: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Props(ArticleListProps),
    NotFound,
}

/// Acquire the data for the article listing page.
///
/// Never fails: errors are logged and reported as `PageOutcome::NotFound`.
pub async fn load_article_list(
    ctx: RequestContext<'_>,
    stores: &StoreRegistry,
    origin: &str,
) -> PageOutcome {
    match fetch_article_list(ctx, stores, origin).await {
        Ok(props) => PageOutcome::Props(props),
        Err(e) => {
            error!("Unable to fetch data for article page: {}", e);
            PageOutcome::NotFound
        }
    }
}

/// Fetch, validate and sort; the error says which step failed.
pub async fn fetch_article_list(
    ctx: RequestContext<'_>,
    stores: &StoreRegistry,
    origin: &str,
) -> Result<ArticleListProps, PageError> {
    let multi_language = is_multi_language(ctx.locales);
    let href_lang = build_href_lang(origin, ctx.locales);

    let store = stores.store_for(ctx.locale)?;

    let articles = store
        .get_object(
            &ObjectRequest::new(ARTICLE_OBJECT)
                .refresh(true)
                .params(ARTICLE_PARAMS)
                .anon(true),
            ctx.response,
        )
        .await?;

    let footer_menu = store
        .get_object(
            &ObjectRequest::new(MENU_OBJECT).refresh(true).anon(true),
            ctx.response,
        )
        .await?;

    let mut sorted_articles = match articles {
        Some(Value::Array(items)) if !items.is_empty() => items,
        None | Some(Value::Null) | Some(Value::Array(_)) => {
            return Err(PageError::EmptyResult {
                object_name: ARTICLE_OBJECT.to_string(),
            })
        }
        Some(other) => {
            return Err(PageError::Malformed {
                object_name: ARTICLE_OBJECT.to_string(),
                reason: format!("expected a collection, got {}", json_kind(&other)),
            })
        }
    };

    sort_by_date(&mut sorted_articles, "changed", Direction::Desc);
    debug!("Sorted {} articles by changed date", sorted_articles.len());

    Ok(ArticleListProps {
        sorted_articles,
        href_lang,
        multi_language,
        footer_menu,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
