//! Shelf reconciliation and reactive data layer between `bookshelf-api` and
//! presentation code.
//!
//! - **[`Controller`]**: owns one catalog connection.
//!   [`connect()`](Controller::connect) loads the collection and starts the
//!   command processor; [`Controller::oneshot()`](Controller::oneshot) wraps
//!   a single CLI invocation.
//!
//! - **[`Collection`]**: the pure reconciler. Every shelf change produces a
//!   new collection via [`Collection::apply`], so published snapshots are
//!   never mutated in place.
//!
//! - **[`ShelfStore`]**: `tokio::sync::watch` backed holder of the current
//!   collection, vended to subscribers as a [`CollectionStream`].
//!
//! - **[`Catalog`]**: the seam to the remote catalog. [`RemoteCatalog`]
//!   speaks HTTP through `bookshelf-api`.

pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
mod convert;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, RemoteCatalog};
pub use command::{Command, CommandResult, ShelfOutcome};
pub use config::{CatalogConfig, TlsVerification, UpdatePolicy};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use reconcile::{Collection, ShelfChange, ShelfGroup, ShelfTransition};
pub use store::ShelfStore;
pub use stream::CollectionStream;

pub use model::{Book, BookId, ImageLinks, Shelf, ShelfInfo, ShelfMapping, shelves};

/// Public catalog used when neither a profile nor `--catalog` names one.
pub use bookshelf_api::DEFAULT_CATALOG_URL;
