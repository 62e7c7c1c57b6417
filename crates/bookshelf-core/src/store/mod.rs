// ── Reactive collection store ──
//
// Holds the current `Collection` snapshot. Every replacement bumps a
// version counter and is pushed to subscribers through `watch` channels.

mod refresh;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::reconcile::Collection;
use crate::stream::CollectionStream;

/// Single source of truth for what is presented.
///
/// Reads are wait-free `Arc` clones. The controller's command processor is
/// the only writer, so replacements are applied in issue order.
pub struct ShelfStore {
    snapshot: watch::Sender<Arc<Collection>>,
    version: watch::Sender<u64>,
    last_full_load: watch::Sender<Option<DateTime<Utc>>>,
}

impl ShelfStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Collection::new()));
        let (version, _) = watch::channel(0u64);
        let (last_full_load, _) = watch::channel(None);

        Self {
            snapshot,
            version,
            last_full_load,
        }
    }

    /// Current collection (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Collection> {
        self.snapshot.borrow().clone()
    }

    /// Publish a new collection.
    pub fn replace(&self, collection: Collection) {
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(collection));
        self.version.send_modify(|v| *v += 1);
    }

    /// Number of replacements so far.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// When the collection was last loaded wholesale from the catalog.
    pub fn last_full_load(&self) -> Option<DateTime<Utc>> {
        *self.last_full_load.borrow()
    }

    /// Subscribe to collection replacements.
    pub fn subscribe(&self) -> CollectionStream {
        CollectionStream::new(self.snapshot.subscribe())
    }
}

impl Default for ShelfStore {
    fn default() -> Self {
        Self::new()
    }
}
