// ── Command API ──
//
// Every mutation of the collection flows through a `Command`. The
// controller's processor task handles them one at a time, in the order
// they were issued.

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{BookId, ShelfMapping};
use crate::reconcile::{ShelfChange, ShelfTransition};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All mutations the controller accepts.
#[derive(Debug, Clone)]
pub enum Command {
    /// Move a book to a shelf (or `Shelf::None` to stop tracking it).
    ChangeShelf(ShelfChange),
    /// Reload the collection wholesale from the catalog.
    Refresh,
}

/// Result of a command execution.
#[derive(Debug, Clone)]
pub enum CommandResult {
    ShelfChanged(ShelfOutcome),
    Refreshed { count: usize },
}

/// What a committed shelf change did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfOutcome {
    pub id: BookId,
    pub transition: ShelfTransition,
    /// The catalog's shelf mapping after the change.
    pub mapping: ShelfMapping,
}
