// ── Catalog seam ──
//
// The controller talks to the catalog only through `Catalog`. The HTTP
// implementation converts wire records into domain types; tests plug in
// an in-memory implementation.

use std::future::Future;

use bookshelf_api::transport::{TlsMode, TransportConfig};
use bookshelf_api::CatalogClient;
use tracing::debug;

use crate::config::{CatalogConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Book, BookId, Shelf, ShelfMapping};

/// Request/response contract of the remote catalog.
pub trait Catalog: Send + Sync + 'static {
    /// Every tracked book with its current shelf.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, CoreError>> + Send;

    /// One book; untracked books come back with `Shelf::None`.
    fn get(&self, id: &BookId) -> impl Future<Output = Result<Book, CoreError>> + Send;

    /// Persist `book` on `shelf` and report the resulting mapping.
    fn update(
        &self,
        book: &Book,
        shelf: Shelf,
    ) -> impl Future<Output = Result<ShelfMapping, CoreError>> + Send;

    /// Free-text search. Results carry no tracked shelf.
    fn search(
        &self,
        query: &str,
        max_results: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Book>, CoreError>> + Send;
}

/// `Catalog` over HTTP.
pub struct RemoteCatalog {
    client: CatalogClient,
}

impl RemoteCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = CatalogClient::new(config.url.clone(), &config.token, &transport)?;
        debug!(url = %config.url, "catalog client ready");
        Ok(Self { client })
    }

    pub fn from_client(client: CatalogClient) -> Self {
        Self { client }
    }
}

impl Catalog for RemoteCatalog {
    async fn get_all(&self) -> Result<Vec<Book>, CoreError> {
        let records = self.client.get_all().await?;
        Ok(records.into_iter().map(Book::from).collect())
    }

    async fn get(&self, id: &BookId) -> Result<Book, CoreError> {
        match self.client.get_book(id.as_str()).await {
            Ok(record) => Ok(Book::from(record)),
            Err(e) if e.is_not_found() => Err(CoreError::BookNotFound { id: id.to_string() }),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, book: &Book, shelf: Shelf) -> Result<ShelfMapping, CoreError> {
        let mapping = self
            .client
            .update_shelf(book.id.as_str(), shelf.key())
            .await?;
        Ok(ShelfMapping::from(mapping))
    }

    async fn search(&self, query: &str, max_results: Option<u32>) -> Result<Vec<Book>, CoreError> {
        let records = self.client.search(query, max_results).await?;
        Ok(records.into_iter().map(Book::from).collect())
    }
}

fn build_transport(config: &CatalogConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
