// ── Domain model ──

pub mod book;
pub mod shelf;

pub use book::{Book, BookId, ImageLinks};
pub use shelf::{Shelf, ShelfInfo, ShelfMapping, shelves};
