// ── Collection subscription handle ──

use std::sync::Arc;

use tokio::sync::watch;

use crate::reconcile::Collection;

/// Receives every collection the store publishes.
pub struct CollectionStream {
    rx: watch::Receiver<Arc<Collection>>,
}

impl CollectionStream {
    pub(crate) fn new(rx: watch::Receiver<Arc<Collection>>) -> Self {
        Self { rx }
    }

    /// The latest collection, without marking it seen.
    pub fn current(&self) -> Arc<Collection> {
        self.rx.borrow().clone()
    }

    /// The latest collection, marking it seen.
    pub fn latest(&mut self) -> Arc<Collection> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next replacement. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Collection>> {
        self.rx.changed().await.ok()?;
        Some(self.latest())
    }
}
