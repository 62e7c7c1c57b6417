#![allow(clippy::unwrap_used)]
// End-to-end tests: `Controller` over `RemoteCatalog` against a wiremock catalog.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookshelf_core::{
    Book, CatalogConfig, Controller, CoreError, Shelf, ShelfTransition, UpdatePolicy,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn record(id: &str, shelf: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Title {id}"),
        "authors": ["Someone"],
        "shelf": shelf,
    })
}

async fn catalog_with_listing() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .and(header("authorization", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [
                record("a", "currentlyReading"),
                record("b", "wantToRead"),
                record("c", "read"),
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn config(server: &MockServer, policy: UpdatePolicy) -> CatalogConfig {
    let mut config = CatalogConfig::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("secret"),
    );
    config.timeout = Duration::from_secs(5);
    config.update_policy = policy;
    config
}

fn ids_on(controller: &Controller, shelf: Shelf) -> Vec<String> {
    controller
        .collection()
        .on_shelf(shelf)
        .map(|b| b.id.to_string())
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn oneshot_loads_and_groups_collection() {
    let server = catalog_with_listing().await;

    let groups = Controller::oneshot(&config(&server, UpdatePolicy::Confirmed), |c| async move {
        Ok(c.collection()
            .grouped()
            .iter()
            .map(|g| (g.info.name, g.books.len()))
            .collect::<Vec<_>>())
    })
    .await
    .unwrap();

    assert_eq!(
        groups,
        vec![("Currently Reading", 1), ("Want to Read", 1), ("Read", 1)]
    );
}

#[tokio::test]
async fn move_is_applied_after_acknowledgement() {
    let server = catalog_with_listing().await;
    Mock::given(method("PUT"))
        .and(path("/books/b"))
        .and(body_json(json!({ "shelf": "read" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "currentlyReading": ["a"],
            "wantToRead": [],
            "read": ["c", "b"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(&config(&server, UpdatePolicy::Confirmed)).unwrap();
    controller.connect().await.unwrap();

    let outcome = controller
        .change_shelf(Book::new("b", Shelf::WantToRead), Shelf::Read)
        .await
        .unwrap();

    assert_eq!(
        outcome.transition,
        ShelfTransition::Moved {
            from: Shelf::WantToRead,
            to: Shelf::Read
        }
    );
    assert!(ids_on(&controller, Shelf::WantToRead).is_empty());
    assert_eq!(ids_on(&controller, Shelf::Read), vec!["b", "c"]);
    controller.disconnect().await;
}

#[tokio::test]
async fn rejected_update_keeps_collection() {
    let server = catalog_with_listing().await;
    Mock::given(method("PUT"))
        .and(path("/books/a"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let controller = Controller::new(&config(&server, UpdatePolicy::Optimistic)).unwrap();
    controller.connect().await.unwrap();

    let result = controller
        .change_shelf(Book::new("a", Shelf::CurrentlyReading), Shelf::None)
        .await;

    assert!(matches!(result, Err(CoreError::Api { status: Some(500), .. })));
    assert_eq!(ids_on(&controller, Shelf::CurrentlyReading), vec!["a"]);
    controller.disconnect().await;
}

#[tokio::test]
async fn search_results_carry_tracked_shelves() {
    let server = catalog_with_listing().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({ "query": "title", "maxResults": 20 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [
                { "id": "c", "title": "Title c" },
                { "id": "n", "title": "Title n" },
            ]
        })))
        .mount(&server)
        .await;

    let results = Controller::oneshot(&config(&server, UpdatePolicy::Confirmed), |c| async move {
        c.search("title").await
    })
    .await
    .unwrap();

    let shelves: Vec<_> = results.iter().map(|b| (b.id.to_string(), b.shelf)).collect();
    assert_eq!(
        shelves,
        vec![("c".to_string(), Shelf::Read), ("n".to_string(), Shelf::None)]
    );
}

#[tokio::test]
async fn bad_token_fails_connect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = Controller::oneshot(&config(&server, UpdatePolicy::Confirmed), |_| async {
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
}
