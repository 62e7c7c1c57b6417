//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod books;
pub mod config_cmd;
pub mod search;
pub mod shelves;
pub mod util;

use bookshelf_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a catalog-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => books::list(controller, &args, global),
        Command::Show(args) => books::show(controller, &args, global).await,
        Command::Move(args) => books::move_book(controller, args, global).await,
        Command::Remove(args) => books::remove(controller, args, global).await,
        Command::Search(args) => search::handle(controller, &args, global).await,
        Command::Shelves => shelves::handle(controller, global),
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before connecting".into(),
        )),
    }
}
