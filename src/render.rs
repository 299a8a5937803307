//! HTML view for the article listing and the not-found page.
//!
//! Rendering is a pure function of the page props and the active locale.
//! Every interpolated value goes through `escape_html`.

use crate::i18n::{HrefLang, Locale};
use crate::page::ArticleListProps;
use chrono::DateTime;
use serde_json::Value;

pub const SITE_TITLE: &str = "Decoupled Next Drupal Demo";
pub const SITE_DESCRIPTION: &str = "Generated by create-pantheon-decoupled-kit.";
pub const PAGE_HEADING: &str = "Articles";
pub const CONTENT_TYPE: &str = "articles";

/// Per-request view inputs that are not part of the page props.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Locale the visitor is browsing in
    pub locale: &'a Locale,
    /// Prefix for backend-relative asset URLs such as images
    pub asset_origin: &'a str,
}

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }

    result
}

/// Render the full article listing page.
pub fn render_article_list(props: &ArticleListProps, view: &ViewContext<'_>) -> String {
    let head = seo_head(SITE_TITLE, SITE_DESCRIPTION, &props.href_lang);

    let mut body = page_header(PAGE_HEADING);
    body.push_str(&article_grid(
        &props.sorted_articles,
        CONTENT_TYPE,
        props.multi_language,
        view,
    ));

    layout(view.locale.as_str(), &head, props.footer_menu.as_ref(), &body)
}

/// Render the page served when data acquisition fails, in the request's locale.
pub fn render_not_found(locale: &Locale) -> String {
    let head = format!("<title>Page not found | {}</title>\n", escape_html(SITE_TITLE));
    let body = format!(
        "{}<p>The page you requested could not be found.</p>\n",
        page_header("Page not found")
    );
    layout(locale.as_str(), &head, None, &body)
}

fn layout(lang: &str, head: &str, menu: Option<&Value>, body: &str) -> String {
    let mut html = String::with_capacity(head.len() + body.len() + 512);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n", escape_html(lang)));
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(head);
    html.push_str("</head>\n<body>\n<header>\n");
    html.push_str(&navigation(menu));
    html.push_str("</header>\n<main>\n");
    html.push_str(body);
    html.push_str("</main>\n<footer>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(SITE_TITLE)));
    html.push_str("</footer>\n</body>\n</html>\n");

    html
}

fn seo_head(title: &str, description: &str, alternates: &[HrefLang]) -> String {
    let title = escape_html(title);
    let description = escape_html(description);

    let mut head = format!("<title>{}</title>\n", title);
    head.push_str(&format!("<meta name=\"description\" content=\"{}\">\n", description));
    head.push_str(&format!("<meta property=\"og:title\" content=\"{}\">\n", title));
    head.push_str(&format!(
        "<meta property=\"og:description\" content=\"{}\">\n",
        description
    ));

    for alternate in alternates {
        head.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            escape_html(alternate.href_lang.as_str()),
            escape_html(&alternate.href)
        ));
    }

    head
}

/// Top-level, enabled menu links in backend order.
fn navigation(menu: Option<&Value>) -> String {
    let items: Vec<&Value> = menu
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| {
                    is_top_level(item) && item.get("enabled") != Some(&Value::Bool(false))
                })
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        return String::new();
    }

    let mut nav = String::from("<nav>\n<ul>\n");
    for item in items {
        let title = item.get("title").and_then(Value::as_str).unwrap_or_default();
        let url = item.get("url").and_then(Value::as_str).unwrap_or("/");
        nav.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(url),
            escape_html(title)
        ));
    }
    nav.push_str("</ul>\n</nav>\n");
    nav
}

fn is_top_level(item: &Value) -> bool {
    match item.get("parent") {
        None | Some(Value::Null) => true,
        Some(Value::String(parent)) => parent.is_empty(),
        Some(_) => false,
    }
}

fn page_header(title: &str) -> String {
    format!(
        "<div class=\"page-header\"><h1>{}</h1></div>\n",
        escape_html(title)
    )
}

fn article_grid(
    articles: &[Value],
    content_type: &str,
    multi_language: bool,
    view: &ViewContext<'_>,
) -> String {
    let mut grid = format!(
        concat!(
            "<section class=\"grid\" data-content-type=\"{}\" ",
            "data-multi-language=\"{}\" data-locale=\"{}\">\n"
        ),
        escape_html(content_type),
        multi_language,
        escape_html(view.locale.as_str())
    );

    if articles.is_empty() {
        grid.push_str(&format!(
            "<p class=\"grid-empty\">No {} found</p>\n",
            escape_html(content_type)
        ));
    }

    for article in articles {
        grid.push_str(&grid_item(article, content_type, multi_language, view));
    }

    grid.push_str("</section>\n");
    grid
}

fn grid_item(
    article: &Value,
    content_type: &str,
    multi_language: bool,
    view: &ViewContext<'_>,
) -> String {
    let title = article.get("title").and_then(Value::as_str).unwrap_or("Untitled");
    let href = item_link(article, content_type, multi_language, view.locale);

    let mut item = String::from("<article class=\"grid-item\">\n");

    if let Some((src, alt)) = item_image(article, view.asset_origin) {
        item.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
            escape_html(&src),
            escape_html(alt.unwrap_or(title))
        ));
    }

    item.push_str(&format!(
        "<h2><a href=\"{}\">{}</a></h2>\n",
        escape_html(&href),
        escape_html(title)
    ));

    if let Some(changed) = article.get("changed").and_then(Value::as_str) {
        if let Ok(date) = DateTime::parse_from_rfc3339(changed) {
            item.push_str(&format!(
                "<time datetime=\"{}\">{}</time>\n",
                escape_html(changed),
                date.format("%B %-d, %Y")
            ));
        }
    }

    item.push_str(&format!(
        "<a class=\"read-more\" href=\"{}\">Read more</a>\n</article>\n",
        escape_html(&href)
    ));
    item
}

/// Path alias when Drupal has one, otherwise `/{content_type}/{id}`;
/// prefixed with the locale in multi-language mode.
fn item_link(article: &Value, content_type: &str, multi_language: bool, locale: &Locale) -> String {
    let path = article
        .get("path")
        .and_then(|p| p.get("alias"))
        .and_then(Value::as_str)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let id = article.get("id").and_then(Value::as_str).unwrap_or_default();
            format!("/{}/{}", content_type, id)
        });

    if multi_language {
        format!("/{}{}", locale, path)
    } else {
        path
    }
}

/// Image from the media reference, `field_media_image.field_media_image.uri.url`.
fn item_image<'a>(article: &'a Value, asset_origin: &str) -> Option<(String, Option<&'a str>)> {
    let file = article.get("field_media_image")?.get("field_media_image")?;
    let url = file.get("uri")?.get("url")?.as_str()?;
    let alt = file
        .get("meta")
        .and_then(|m| m.get("alt"))
        .and_then(Value::as_str)
        .filter(|alt| !alt.is_empty());

    let absolute = ["http://", "https://", "//"].iter().any(|scheme| url.starts_with(scheme));
    let src = if absolute {
        url.to_string()
    } else {
        format!("{}{}", asset_origin.trim_end_matches('/'), url)
    };

    Some((src, alt))
}
