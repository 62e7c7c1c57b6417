// ── Shelf types ──
//
// The shelf set is closed: three display shelves plus `None` for books the
// user does not track. Wire keys match the catalog's JSON exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::book::BookId;

/// Where a book lives.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum Shelf {
    #[strum(to_string = "currentlyReading", serialize = "currently-reading", serialize = "reading")]
    CurrentlyReading,
    #[strum(to_string = "wantToRead", serialize = "want-to-read", serialize = "want")]
    WantToRead,
    #[strum(to_string = "read")]
    Read,
    /// Untracked.
    #[default]
    #[strum(to_string = "none")]
    None,
}

impl Shelf {
    /// The display shelves, in presentation order.
    pub const DISPLAYED: [Self; 3] = [Self::CurrentlyReading, Self::WantToRead, Self::Read];

    /// Wire key, e.g. `"wantToRead"`.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Human-readable name, e.g. `"Want to Read"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CurrentlyReading => "Currently Reading",
            Self::WantToRead => "Want to Read",
            Self::Read => "Read",
            Self::None => "None",
        }
    }

    /// `true` for the three display shelves, `false` for `None`.
    pub fn is_tracked(self) -> bool {
        match self {
            Self::CurrentlyReading | Self::WantToRead | Self::Read => true,
            Self::None => false,
        }
    }

    pub fn info(self) -> ShelfInfo {
        ShelfInfo {
            key: self,
            name: self.display_name(),
        }
    }
}

/// Shelf metadata handed to presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShelfInfo {
    pub key: Shelf,
    pub name: &'static str,
}

/// The three display shelves with their names, in order.
pub fn shelves() -> [ShelfInfo; 3] {
    Shelf::DISPLAYED.map(Shelf::info)
}

/// The catalog's view of every shelf after an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShelfMapping(pub BTreeMap<Shelf, Vec<BookId>>);

impl ShelfMapping {
    /// The shelf holding `id`, or `Shelf::None` if no shelf lists it.
    pub fn shelf_of(&self, id: &BookId) -> Shelf {
        self.0
            .iter()
            .find(|(_, ids)| ids.contains(id))
            .map_or(Shelf::None, |(shelf, _)| *shelf)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
