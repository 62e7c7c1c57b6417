// ── Book domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::shelf::Shelf;

/// Catalog identifier of a book. Opaque and unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A book plus its shelf assignment.
///
/// Catalog metadata the organizer does not interpret stays in `extra` and is
/// passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub shelf: Shelf,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
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

impl Book {
    /// A bare book with no metadata.
    pub fn new(id: impl Into<BookId>, shelf: Shelf) -> Self {
        Self {
            id: id.into(),
            shelf,
            title: String::new(),
            subtitle: None,
            authors: Vec::new(),
            image_links: None,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_shelf(mut self, shelf: Shelf) -> Self {
        self.shelf = shelf;
        self
    }

    /// Authors joined for display; empty when the catalog lists none.
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// Best available cover URL.
    pub fn cover_url(&self) -> Option<&str> {
        let links = self.image_links.as_ref()?;
        links
            .thumbnail
            .as_deref()
            .or(links.small_thumbnail.as_deref())
    }
}
