#![allow(clippy::unwrap_used)]
// Integration tests for `CatalogClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookshelf_api::{CatalogClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CatalogClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = CatalogClient::new(
        base_url,
        &SecretString::from("test-token"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn book(id: &str, shelf: Option<&str>) -> serde_json::Value {
    let mut value = json!({
        "id": id,
        "title": format!("Title {id}"),
        "authors": ["Someone"],
        "imageLinks": { "smallThumbnail": "http://img/s.jpg", "thumbnail": "http://img/t.jpg" },
        "publisher": "Press"
    });
    if let Some(shelf) = shelf {
        value["shelf"] = json!(shelf);
    }
    value
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_sends_token_and_unwraps_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .and(header("authorization", "test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [book("a", Some("read")), book("b", Some("wantToRead"))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let books = client.get_all().await.unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, "a");
    assert_eq!(books[0].shelf.as_deref(), Some("read"));
    assert_eq!(books[1].authors, vec!["Someone".to_string()]);
    assert_eq!(
        books[1].image_links.as_ref().unwrap().thumbnail.as_deref(),
        Some("http://img/t.jpg")
    );
    assert_eq!(books[1].extra.get("publisher"), Some(&json!("Press")));
}

#[tokio::test]
async fn test_get_book() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books/xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "book": book("xyz", Some("none"))
        })))
        .mount(&server)
        .await;

    let record = client.get_book("xyz").await.unwrap();
    assert_eq!(record.id, "xyz");
    assert_eq!(record.shelf.as_deref(), Some("none"));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_shelf_returns_mapping() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/books/a"))
        .and(body_json(json!({ "shelf": "currentlyReading" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "currentlyReading": ["a"],
            "wantToRead": ["b"],
            "read": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mapping = client.update_shelf("a", "currentlyReading").await.unwrap();
    assert_eq!(mapping.shelf_of("a"), Some("currentlyReading"));
    assert_eq!(mapping.shelf_of("b"), Some("wantToRead"));
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_posts_query() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({ "query": "linux", "maxResults": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [book("l1", None), book("l2", None)]
        })))
        .mount(&server)
        .await;

    let results = client.search("linux", Some(10)).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|b| b.shelf.is_none()));
}

#[tokio::test]
async fn test_search_error_envelope_is_empty_result() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": { "error": "empty query", "items": [] }
        })))
        .mount(&server)
        .await;

    let results = client.search("zzzzqqq", None).await.unwrap();
    assert!(results.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.get_all().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_book("missing").await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("catalog exploded"))
        .mount(&server)
        .await;

    match client.update_shelf("a", "read").await {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("exploded"), "unexpected message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    match client.get_all().await {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("oops")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_reported_with_configured_seconds() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_secs(1),
        ..TransportConfig::default()
    };
    let client = CatalogClient::new(
        Url::parse(&server.uri()).unwrap(),
        &SecretString::from("t"),
        &transport,
    )
    .unwrap();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "books": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client.get_all().await;
    assert!(
        matches!(result, Err(Error::Timeout { timeout_secs: 1 })),
        "expected Timeout error, got: {result:?}"
    );
}
