//! Integration tests for the article listing service
//!
//! These tests run the full stack: axum router, page data acquisition and the
//! Drupal JSON:API store, against a mocked Drupal backend.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use decoupled_articles::{
    config::Config,
    i18n::Locale,
    server::{router, AppState},
};

// ==================== Test Helpers ====================

fn locale(code: &str) -> Locale {
    Locale::parse(code).expect("valid locale")
}

/// Create a test config pointing at the mocked Drupal backend
fn create_test_config(backend_url: &str, locales: &[&str]) -> Config {
    let locales: Vec<Locale> = locales.iter().map(|c| locale(c)).collect();
    Config {
        frontend_url: "https://www.example.com".to_string(),
        backend_url: backend_url.to_string(),
        jsonapi_prefix: "jsonapi".to_string(),
        client_id: None,
        client_secret: None,
        backend_timeout: None,
        default_locale: locales[0].clone(),
        locales,
        port: 3000,
    }
}

/// A JSON:API article collection with one included image
fn articles_document() -> Value {
    json!({
        "jsonapi": { "version": "1.0" },
        "data": [
            {
                "type": "node--article",
                "id": "old",
                "attributes": {
                    "title": "Oldest article",
                    "changed": "2023-05-01T09:00:00+00:00",
                    "path": { "alias": "/articles/oldest" }
                },
                "relationships": {
                    "field_media_image": { "data": null }
                }
            },
            {
                "type": "node--article",
                "id": "new",
                "attributes": {
                    "title": "Newest article",
                    "changed": "2024-02-10T12:00:00+00:00",
                    "path": { "alias": "/articles/newest" }
                },
                "relationships": {
                    "field_media_image": { "data": { "type": "media--image", "id": "m1" } }
                }
            },
            {
                "type": "node--article",
                "id": "mid",
                "attributes": {
                    "title": "Middle article",
                    "changed": "2023-11-20T18:30:00+00:00",
                    "path": { "alias": "/articles/middle" }
                }
            }
        ],
        "included": [
            {
                "type": "media--image",
                "id": "m1",
                "relationships": {
                    "field_media_image": {
                        "data": { "type": "file--file", "id": "f1", "meta": { "alt": "Cover" } }
                    }
                }
            },
            {
                "type": "file--file",
                "id": "f1",
                "attributes": { "uri": { "url": "/sites/default/files/cover.png" } }
            }
        ]
    })
}

fn menu_document() -> Value {
    json!({
        "data": [
            {
                "type": "menu_link_content--menu_link_content",
                "id": "menu_link_content:1",
                "attributes": {
                    "title": "Home",
                    "url": "/",
                    "parent": "",
                    "weight": 0,
                    "enabled": true
                }
            },
            {
                "type": "menu_link_content--menu_link_content",
                "id": "menu_link_content:2",
                "attributes": {
                    "title": "Articles",
                    "url": "/articles",
                    "parent": "",
                    "weight": 1,
                    "enabled": true
                }
            }
        ]
    })
}

async fn mount_backend(
    server: &MockServer,
    prefix: &str,
    articles: ResponseTemplate,
    menu: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(format!("{}/jsonapi/node/article", prefix)))
        .and(query_param("include", "field_media_image.field_media_image"))
        .respond_with(articles)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/jsonapi/menu_items/main", prefix)))
        .respond_with(menu)
        .mount(server)
        .await;
}

async fn request(config: Config, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let state = Arc::new(AppState::from_config(config).expect("state"));
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("response");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, headers, String::from_utf8(body.to_vec()).expect("utf-8"))
}

// ==================== Single Language ====================

#[tokio::test]
async fn test_article_list_renders_sorted_articles() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "",
        ResponseTemplate::new(200)
            .insert_header("Surrogate-Key", "node_list")
            .set_body_json(articles_document()),
        ResponseTemplate::new(200)
            .insert_header("Surrogate-Key", "config:system.menu.main")
            .set_body_json(menu_document()),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en"]);
    let (status, headers, body) = request(config, "/articles").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Decoupled Next Drupal Demo</title>"));
    assert!(body.contains("<h1>Articles</h1>"));

    let newest = body.find("Newest article").expect("newest");
    let middle = body.find("Middle article").expect("middle");
    let oldest = body.find("Oldest article").expect("oldest");
    assert!(newest < middle && middle < oldest);

    // single language: no locale prefix on links
    assert!(body.contains("href=\"/articles/newest\""));
    assert!(body.contains("hreflang=\"en\" href=\"https://www.example.com/en\""));
    assert!(body.contains("src=\"") && body.contains("/sites/default/files/cover.png\""));
    assert!(body.contains("<li><a href=\"/articles\">Articles</a></li>"));

    assert_eq!(
        headers.get("surrogate-key").and_then(|v| v.to_str().ok()),
        Some("config:system.menu.main node_list")
    );
}

#[tokio::test]
async fn test_backend_failure_returns_not_found() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "",
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
        ResponseTemplate::new(200).set_body_json(menu_document()),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en"]);
    let (status, _, body) = request(config, "/articles").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
    assert!(!body.contains("<h1>Articles</h1>"));
}

#[tokio::test]
async fn test_menu_failure_returns_not_found() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "",
        ResponseTemplate::new(200).set_body_json(articles_document()),
        ResponseTemplate::new(404).set_body_string("Not Found"),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en"]);
    let (status, _, _) = request(config, "/articles").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_collection_returns_not_found() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "",
        ResponseTemplate::new(200).set_body_json(json!({ "data": [] })),
        ResponseTemplate::new(200).set_body_json(menu_document()),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en"]);
    let (status, _, _) = request(config, "/articles").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_every_request_hits_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jsonapi/node/article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_document()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jsonapi/menu_items/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(menu_document()))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &["en"]);
    let state = Arc::new(AppState::from_config(config).expect("state"));

    for _ in 0..2 {
        let response = router(state.clone())
            .oneshot(Request::builder().uri("/articles").body(Body::empty()).unwrap())
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// ==================== Multi Language ====================

#[tokio::test]
async fn test_multi_language_uses_locale_store() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "/es",
        ResponseTemplate::new(200).set_body_json(articles_document()),
        ResponseTemplate::new(200).set_body_json(menu_document()),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en", "es"]);
    let (status, _, body) = request(config, "/es/articles").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html lang=\"es\">"));
    assert!(body.contains("href=\"/es/articles/newest\""));
    assert!(body.contains("data-multi-language=\"true\""));
    assert!(body.contains("hreflang=\"en\" href=\"https://www.example.com/en\""));
    assert!(body.contains("hreflang=\"es\" href=\"https://www.example.com/es\""));
}

#[tokio::test]
async fn test_multi_language_default_route_uses_default_locale() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        "/en",
        ResponseTemplate::new(200).set_body_json(articles_document()),
        ResponseTemplate::new(200).set_body_json(menu_document()),
    )
    .await;

    let config = create_test_config(&server.uri(), &["en", "es"]);
    let (status, _, body) = request(config, "/articles").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html lang=\"en\">"));
    assert!(body.contains("href=\"/en/articles/newest\""));
}

#[tokio::test]
async fn test_unconfigured_locale_returns_not_found() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &["en", "es"]);

    let (status, _, _) = request(config, "/de/articles").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
