// Catalog book endpoints
//
// `GET /books`, `GET /books/{id}`, `PUT /books/{id}` and `POST /search`.

use tracing::debug;

use crate::client::CatalogClient;
use crate::error::Error;
use crate::models::{
    BookEnvelope, BookRecord, BooksEnvelope, SearchBooks, SearchEnvelope, SearchRequest,
    ShelfMapping, UpdateRequest,
};

impl CatalogClient {
    /// List every book the token tracks, each with its current shelf.
    ///
    /// `GET /books`
    pub async fn get_all(&self) -> Result<Vec<BookRecord>, Error> {
        let url = self.url("books")?;
        let envelope: BooksEnvelope = self.get(url).await?;
        debug!(count = envelope.books.len(), "listed tracked books");
        Ok(envelope.books)
    }

    /// Fetch a single book. Untracked books come back with shelf `"none"`.
    ///
    /// `GET /books/{id}`
    pub async fn get_book(&self, id: &str) -> Result<BookRecord, Error> {
        let url = self.item_url("books", id)?;
        let envelope: BookEnvelope = self.get(url).await?;
        Ok(envelope.book)
    }

    /// Move a book to `shelf` (a shelf key, or `"none"` to stop tracking).
    ///
    /// `PUT /books/{id}` with `{"shelf": "..."}`. The catalog answers with
    /// the complete shelf -> ids mapping after the change.
    pub async fn update_shelf(&self, id: &str, shelf: &str) -> Result<ShelfMapping, Error> {
        let url = self.item_url("books", id)?;
        debug!(id, shelf, "updating shelf");
        self.put(url, &UpdateRequest { shelf }).await
    }

    /// Search the catalog.
    ///
    /// `POST /search` with `{"query": "...", "maxResults": N}`. A query the
    /// catalog cannot match yields an empty list rather than an error.
    pub async fn search(
        &self,
        query: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<BookRecord>, Error> {
        let url = self.url("search")?;
        let envelope: SearchEnvelope = self
            .post(url, &SearchRequest { query, max_results })
            .await?;

        match envelope.books {
            SearchBooks::Found(books) => {
                debug!(query, count = books.len(), "search results");
                Ok(books)
            }
            SearchBooks::Empty { error, .. } => {
                debug!(query, reason = %error, "search matched nothing");
                Ok(Vec::new())
            }
        }
    }
}
