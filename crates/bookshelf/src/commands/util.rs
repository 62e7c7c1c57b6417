//! Shared helpers for command handlers.

use std::io::IsTerminal;

use bookshelf_core::Shelf;

use crate::cli::ShelfArg;
use crate::error::CliError;

impl From<ShelfArg> for Shelf {
    fn from(arg: ShelfArg) -> Self {
        match arg {
            ShelfArg::CurrentlyReading => Shelf::CurrentlyReading,
            ShelfArg::WantToRead => Shelf::WantToRead,
            ShelfArg::Read => Shelf::Read,
            ShelfArg::None => Shelf::None,
        }
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Fallback for empty display fields in tables.
pub fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}
