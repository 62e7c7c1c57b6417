// ── Wire -> domain conversion ──
//
// Catalog records carry shelves as free-form strings. Unknown shelf keys
// are treated as untracked so they can never leak into a collection.

use std::collections::BTreeMap;

use bookshelf_api::models as wire;
use serde::Deserialize;
use serde::de::IntoDeserializer;
use serde::de::value::{Error as ValueError, StrDeserializer};
use tracing::warn;

use crate::model::{Book, BookId, ImageLinks, Shelf, ShelfMapping};

/// Parse a catalog shelf key; absent or unknown keys map to `Shelf::None`.
///
/// Only the exact wire keys are accepted. The case-insensitive aliases of
/// `Shelf::from_str` are for command-line input.
pub(crate) fn parse_shelf(raw: Option<&str>) -> Shelf {
    let Some(key) = raw else {
        return Shelf::None;
    };
    let exact: StrDeserializer<'_, ValueError> = key.into_deserializer();
    Shelf::deserialize(exact).unwrap_or_else(|_| {
        warn!(shelf = key, "unknown shelf key from catalog, treating as untracked");
        Shelf::None
    })
}

impl From<wire::ImageLinks> for ImageLinks {
    fn from(links: wire::ImageLinks) -> Self {
        Self {
            small_thumbnail: links.small_thumbnail,
            thumbnail: links.thumbnail,
        }
    }
}

impl From<wire::BookRecord> for Book {
    fn from(record: wire::BookRecord) -> Self {
        Self {
            shelf: parse_shelf(record.shelf.as_deref()),
            id: BookId::from(record.id),
            title: record.title,
            subtitle: record.subtitle,
            authors: record.authors,
            image_links: record.image_links.map(ImageLinks::from),
            extra: record.extra,
        }
    }
}

impl From<wire::ShelfMapping> for ShelfMapping {
    fn from(mapping: wire::ShelfMapping) -> Self {
        let mut by_shelf = BTreeMap::new();
        for (key, ids) in mapping.0 {
            let shelf = parse_shelf(Some(&key));
            if !shelf.is_tracked() {
                continue;
            }
            by_shelf.insert(shelf, ids.into_iter().map(BookId::from).collect());
        }
        Self(by_shelf)
    }
}
