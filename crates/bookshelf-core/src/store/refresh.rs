// ── Full load from the catalog ──

use chrono::Utc;
use tracing::info;

use super::ShelfStore;
use crate::model::Book;
use crate::reconcile::Collection;

impl ShelfStore {
    /// Replace the collection wholesale with a catalog listing.
    pub(crate) fn apply_catalog_listing(&self, books: Vec<Book>) -> usize {
        let received = books.len();
        let collection = Collection::initialize(books);
        let kept = collection.len();
        self.replace(collection);
        self.last_full_load.send_replace(Some(Utc::now()));
        info!(received, kept, "collection loaded from catalog");
        kept
    }
}
