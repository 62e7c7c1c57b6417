// ── Controller ──
//
// Lifecycle management for one catalog connection: initial load, command
// routing and reactive access to the collection. Shelf changes are
// serialized through a single processor task so they reach the collection
// in the order they were issued.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, RemoteCatalog};
use crate::command::{Command, CommandEnvelope, CommandResult, ShelfOutcome};
use crate::config::{CatalogConfig, UpdatePolicy};
use crate::error::CoreError;
use crate::model::{Book, BookId, Shelf, ShelfInfo, ShelfMapping, shelves};
use crate::reconcile::{Collection, ShelfChange};
use crate::store::ShelfStore;
use crate::stream::CollectionStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
pub struct Controller<C: Catalog = RemoteCatalog> {
    inner: Arc<ControllerInner<C>>,
}

impl<C: Catalog> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<C> {
    catalog: C,
    policy: UpdatePolicy,
    max_search_results: Option<u32>,
    store: Arc<ShelfStore>,
    connection_state: watch::Sender<ConnectionState>,
    /// Held shared by `execute` across its state check and send, and
    /// exclusively by `disconnect` while it flips the state.
    gate: RwLock<()>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    /// Parked here while disconnected; owned by the processor task otherwise.
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    /// Token for the current connection, replaced on reconnect.
    cancel: Mutex<CancellationToken>,
    processor: Mutex<Option<JoinHandle<mpsc::Receiver<CommandEnvelope>>>>,
}

impl Controller<RemoteCatalog> {
    /// Create a controller backed by the HTTP catalog. Does NOT connect;
    /// call [`connect()`](Self::connect) to load the collection.
    pub fn new(config: &CatalogConfig) -> Result<Self, CoreError> {
        let catalog = RemoteCatalog::new(config)?;
        Ok(Self::with_catalog(catalog, config.update_policy)
            .with_max_search_results(config.max_search_results))
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: &CatalogConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let controller = Self::new(config)?;
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }
}

impl<C: Catalog> Controller<C> {
    /// Create a controller over any [`Catalog`].
    pub fn with_catalog(catalog: C, policy: UpdatePolicy) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        Self {
            inner: Arc::new(ControllerInner {
                catalog,
                policy,
                max_search_results: Some(20),
                store: Arc::new(ShelfStore::new()),
                connection_state,
                gate: RwLock::new(()),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: Mutex::new(CancellationToken::new()),
                processor: Mutex::new(None),
            }),
        }
    }

    /// Override the search result bound. Only valid before the controller
    /// is shared.
    #[must_use]
    pub fn with_max_search_results(mut self, max: Option<u32>) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.max_search_results = max;
        }
        self
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.inner.policy
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<ShelfStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Load the collection from the catalog and start the command processor.
    pub async fn connect(&self) -> Result<(), CoreError> {
        if *self.inner.connection_state.borrow() == ConnectionState::Connected {
            return Ok(());
        }
        self.inner.connection_state.send_replace(ConnectionState::Connecting);

        let books = match self.inner.catalog.get_all().await {
            Ok(books) => books,
            Err(e) => {
                self.inner.connection_state.send_replace(ConnectionState::Failed);
                return Err(e);
            }
        };
        self.inner.store.apply_catalog_listing(books);

        let Some(rx) = self.inner.command_rx.lock().await.take() else {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(CoreError::Internal("command processor already running".into()));
        };

        let cancel = CancellationToken::new();
        *self.inner.cancel.lock().await = cancel.clone();

        let handle = tokio::spawn(command_processor_task(self.clone(), rx, cancel));
        *self.inner.processor.lock().await = Some(handle);

        self.inner.connection_state.send_replace(ConnectionState::Connected);
        info!(books = self.inner.store.snapshot().len(), "connected to catalog");
        Ok(())
    }

    /// Stop the command processor. The command in flight completes; commands
    /// still queued are failed with [`CoreError::ControllerDisconnected`].
    pub async fn disconnect(&self) {
        {
            let _closed = self.inner.gate.write().await;
            self.inner.connection_state.send_replace(ConnectionState::Disconnected);
        }
        self.inner.cancel.lock().await.cancel();

        if let Some(handle) = self.inner.processor.lock().await.take() {
            match handle.await {
                Ok(mut rx) => {
                    // Everything queued before the state flip but never reached.
                    while let Ok(envelope) = rx.try_recv() {
                        let _ = envelope
                            .response_tx
                            .send(Err(CoreError::ControllerDisconnected));
                    }
                    *self.inner.command_rx.lock().await = Some(rx);
                }
                Err(e) => warn!(error = %e, "command processor panicked"),
            }
        }

        debug!("disconnected");
    }

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command through the processor task and await its result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        {
            let _open = self.inner.gate.read().await;
            if *self.inner.connection_state.borrow() != ConnectionState::Connected {
                return Err(CoreError::ControllerDisconnected);
            }
            self.inner
                .command_tx
                .send(CommandEnvelope {
                    command: cmd,
                    response_tx: tx,
                })
                .await
                .map_err(|_| CoreError::ControllerDisconnected)?;
        }

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    /// Move `book` to `shelf`. `book.shelf` is the shelf it was shown on.
    pub async fn change_shelf(&self, book: Book, shelf: Shelf) -> Result<ShelfOutcome, CoreError> {
        match self
            .execute(Command::ChangeShelf(ShelfChange::new(book, shelf)))
            .await?
        {
            CommandResult::ShelfChanged(outcome) => Ok(outcome),
            other => Err(CoreError::Internal(format!(
                "unexpected result for shelf change: {other:?}"
            ))),
        }
    }

    /// Reload the collection from the catalog. Returns the tracked count.
    pub async fn refresh(&self) -> Result<usize, CoreError> {
        match self.execute(Command::Refresh).await? {
            CommandResult::Refreshed { count } => Ok(count),
            other => Err(CoreError::Internal(format!(
                "unexpected result for refresh: {other:?}"
            ))),
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Current collection snapshot.
    pub fn collection(&self) -> Arc<Collection> {
        self.inner.store.snapshot()
    }

    /// Subscribe to collection replacements.
    pub fn subscribe(&self) -> CollectionStream {
        self.inner.store.subscribe()
    }

    /// Display shelf metadata, in order.
    pub fn shelves(&self) -> [ShelfInfo; 3] {
        shelves()
    }

    /// Look a book up locally, falling back to the catalog.
    pub async fn book(&self, id: &BookId) -> Result<Book, CoreError> {
        if let Some(book) = self.inner.store.snapshot().get(id) {
            return Ok(book.clone());
        }
        self.inner.catalog.get(id).await
    }

    /// Search the catalog; results carry the shelf the user tracks them on.
    /// A blank query returns nothing without asking the catalog.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let results = self
            .inner
            .catalog
            .search(query, self.inner.max_search_results)
            .await?;
        Ok(self.inner.store.snapshot().annotate(results))
    }

    // ── Command handlers ─────────────────────────────────────────

    async fn apply_shelf_change(&self, change: ShelfChange) -> Result<ShelfOutcome, CoreError> {
        let store = &self.inner.store;
        let id = change.book.id.clone();

        match self.inner.policy {
            UpdatePolicy::Confirmed => {
                let mapping = self.inner.catalog.update(&change.book, change.target).await?;
                verify_acknowledged(&mapping, &change)?;

                let (next, transition) = store.snapshot().apply(&change);
                store.replace(next);
                info!(%id, ?transition, "shelf change applied");
                Ok(ShelfOutcome {
                    id,
                    transition,
                    mapping,
                })
            }
            UpdatePolicy::Optimistic => {
                let before = store.snapshot();
                let (next, transition) = before.apply(&change);
                store.replace(next);
                debug!(%id, ?transition, "shelf change applied optimistically");

                let acknowledged = match self.inner.catalog.update(&change.book, change.target).await
                {
                    Ok(mapping) => verify_acknowledged(&mapping, &change).map(|()| mapping),
                    Err(e) => Err(e),
                };

                match acknowledged {
                    Ok(mapping) => {
                        info!(%id, ?transition, "shelf change confirmed");
                        Ok(ShelfOutcome {
                            id,
                            transition,
                            mapping,
                        })
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "shelf change failed, rolling back");
                        store.replace(store.snapshot().rollback(&before, &id));
                        Err(e)
                    }
                }
            }
        }
    }

    async fn reload(&self) -> Result<usize, CoreError> {
        let books = self.inner.catalog.get_all().await?;
        Ok(self.inner.store.apply_catalog_listing(books))
    }
}

/// Check the catalog's mapping agrees with the requested shelf. An empty
/// mapping carries no information and is accepted.
fn verify_acknowledged(mapping: &ShelfMapping, change: &ShelfChange) -> Result<(), CoreError> {
    if mapping.is_empty() {
        debug!(id = %change.book.id, "catalog returned an empty mapping, nothing to verify");
        return Ok(());
    }
    let reported = mapping.shelf_of(&change.book.id);
    if reported == change.target {
        Ok(())
    } else {
        Err(CoreError::UpdateNotApplied {
            id: change.book.id.clone(),
            requested: change.target,
            reported,
        })
    }
}

// ── Background task ──────────────────────────────────────────────

/// Process commands one at a time until cancelled, then hand the
/// receiver back so a later `connect()` can reuse it.
async fn command_processor_task<C: Catalog>(
    controller: Controller<C>,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) -> mpsc::Receiver<CommandEnvelope> {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    rx
}

async fn route_command<C: Catalog>(
    controller: &Controller<C>,
    cmd: Command,
) -> Result<CommandResult, CoreError> {
    match cmd {
        Command::ChangeShelf(change) => controller
            .apply_shelf_change(change)
            .await
            .map(CommandResult::ShelfChanged),
        Command::Refresh => controller
            .reload()
            .await
            .map(|count| CommandResult::Refreshed { count }),
    }
}
