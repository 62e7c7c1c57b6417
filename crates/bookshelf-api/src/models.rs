// Catalog wire types
//
// These mirror the catalog's JSON payloads. Fields the client does not
// interpret are kept in `extra` so a record can round-trip unmodified.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A book as returned by `GET /books`, `GET /books/{id}` and `POST /search`.
///
/// `shelf` is absent on search results for books the user does not track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf: Option<String>,
    /// Everything else (publisher, description, page count, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Cover image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Response of `PUT /books/{id}`: every shelf key with the ids it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShelfMapping(pub BTreeMap<String, Vec<String>>);

impl ShelfMapping {
    /// The shelf key holding `id`, if any.
    pub fn shelf_of(&self, id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, ids)| ids.iter().any(|candidate| candidate == id))
            .map(|(shelf, _)| shelf.as_str())
    }
}

// ── Envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct BooksEnvelope {
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookEnvelope {
    pub book: BookRecord,
}

/// `POST /search` answers `{"books": [...]}` on success and
/// `{"books": {"error": "empty query", "items": []}}` when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub books: SearchBooks,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchBooks {
    Found(Vec<BookRecord>),
    Empty {
        error: String,
        #[serde(default)]
        #[allow(dead_code)]
        items: Vec<serde_json::Value>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRequest<'a> {
    pub shelf: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}
