//! Async client for the book catalog HTTP API.
//!
//! The catalog owns persistence: it stores which books a user tracks and on
//! which shelf. Every request is scoped by an opaque `Authorization` token, so
//! two tokens see two independent collections.
//!
//! - [`CatalogClient`] wraps `reqwest::Client` with URL construction, envelope
//!   unwrapping and status mapping. Endpoint methods live in [`books`].
//! - [`models`] holds the wire types exactly as the service emits them.
//! - [`TransportConfig`] builds the underlying HTTP client (TLS, timeout,
//!   default headers).

pub mod books;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::CatalogClient;
pub use error::Error;
pub use models::{BookRecord, ImageLinks, ShelfMapping};
pub use transport::{TlsMode, TransportConfig};

/// Public catalog endpoint used when no URL is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://reactnd-books-api.udacity.com";
