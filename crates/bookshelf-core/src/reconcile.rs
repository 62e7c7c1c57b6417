// ── Shelf reconciliation ──
//
// `Collection` is the authoritative list of tracked books. Every transition
// takes `&self` and returns a fresh collection; nothing is mutated in place,
// so a published snapshot can never change under a reader.
//
// Invariants held by every constructor and transition:
// - no entry has `Shelf::None`
// - identifiers are unique

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::model::{Book, BookId, Shelf, ShelfInfo};

/// A user's request to put `book` on `target`.
///
/// `book.shelf` is the shelf the book was shown on when the intent was made;
/// `Shelf::None` for a book picked from search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfChange {
    pub book: Book,
    pub target: Shelf,
}

impl ShelfChange {
    pub fn new(book: Book, target: Shelf) -> Self {
        Self { book, target }
    }
}

/// What a shelf change did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShelfTransition {
    Added { to: Shelf },
    Moved { from: Shelf, to: Shelf },
    Removed { from: Shelf },
    Unchanged { shelf: Shelf },
}

impl ShelfTransition {
    /// Classify a move from `previous` (`None` = untracked) to `target`.
    pub fn classify(previous: Shelf, target: Shelf) -> Self {
        match (previous.is_tracked(), target.is_tracked()) {
            (false, false) => Self::Unchanged { shelf: Shelf::None },
            (false, true) => Self::Added { to: target },
            (true, false) => Self::Removed { from: previous },
            (true, true) if previous == target => Self::Unchanged { shelf: target },
            (true, true) => Self::Moved {
                from: previous,
                to: target,
            },
        }
    }

    /// The shelf the book ends up on.
    pub fn target(self) -> Shelf {
        match self {
            Self::Added { to } | Self::Moved { to, .. } => to,
            Self::Removed { .. } => Shelf::None,
            Self::Unchanged { shelf } => shelf,
        }
    }
}

/// One display shelf and the books on it.
#[derive(Debug, Clone, Serialize)]
pub struct ShelfGroup<'a> {
    #[serde(flatten)]
    pub info: ShelfInfo,
    pub books: Vec<&'a Book>,
}

/// The tracked books.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    books: Vec<Book>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a full catalog listing.
    ///
    /// Untracked entries are dropped and duplicate ids collapse to their
    /// first occurrence, so a misbehaving catalog cannot break invariants.
    pub fn initialize(books: impl IntoIterator<Item = Book>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for book in books {
            if !book.shelf.is_tracked() {
                warn!(id = %book.id, "catalog listed an untracked book, skipping");
                continue;
            }
            if !seen.insert(book.id.clone()) {
                warn!(id = %book.id, "catalog listed a book twice, keeping the first entry");
                continue;
            }
            kept.push(book);
        }

        Self { books: kept }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn contains(&self, id: &BookId) -> bool {
        self.get(id).is_some()
    }

    /// Current shelf of `id`; `Shelf::None` when the book is not tracked.
    pub fn shelf_of(&self, id: &BookId) -> Shelf {
        self.get(id).map_or(Shelf::None, |b| b.shelf)
    }

    /// How applying `change` would classify, judged against this collection.
    pub fn transition_for(&self, change: &ShelfChange) -> ShelfTransition {
        ShelfTransition::classify(self.shelf_of(&change.book.id), change.target)
    }

    /// Apply a shelf change and return the resulting collection.
    ///
    /// Rules, in order:
    /// 1. if the target is a display shelf and the book is absent, append it;
    /// 2. relabel every entry with the book's id to the target;
    /// 3. if the target is `None`, drop every entry with the book's id.
    pub fn apply(&self, change: &ShelfChange) -> (Self, ShelfTransition) {
        let transition = self.transition_for(change);
        let id = &change.book.id;
        let mut books = self.books.clone();

        if change.target.is_tracked() && !books.iter().any(|b| &b.id == id) {
            books.push(change.book.clone().with_shelf(change.target));
        }

        for book in books.iter_mut().filter(|b| &b.id == id) {
            book.shelf = change.target;
        }

        if !change.target.is_tracked() {
            books.retain(|b| &b.id != id);
        }

        (Self { books }, transition)
    }

    /// Restore the entry for `id` to what it was in `previous`.
    ///
    /// Other entries are left as they are in `self`. A book absent from
    /// `previous` is removed; a book present there is put back with its old
    /// shelf and metadata.
    pub fn rollback(&self, previous: &Self, id: &BookId) -> Self {
        let mut books = self.books.clone();
        match previous.get(id) {
            None => books.retain(|b| &b.id != id),
            Some(original) => {
                if let Some(slot) = books.iter_mut().find(|b| &b.id == id) {
                    *slot = original.clone();
                } else {
                    books.push(original.clone());
                }
            }
        }
        Self { books }
    }

    /// Copy tracked shelves onto catalog search results.
    ///
    /// Results the user does not track come back with `Shelf::None`,
    /// whatever the catalog sent.
    pub fn annotate(&self, results: Vec<Book>) -> Vec<Book> {
        results
            .into_iter()
            .map(|book| {
                let shelf = self.shelf_of(&book.id);
                book.with_shelf(shelf)
            })
            .collect()
    }

    /// Books on one shelf, in collection order.
    pub fn on_shelf(&self, shelf: Shelf) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.shelf == shelf)
    }

    /// The display shelves in order, each with its books.
    pub fn grouped(&self) -> Vec<ShelfGroup<'_>> {
        Shelf::DISPLAYED
            .iter()
            .map(|&shelf| ShelfGroup {
                info: shelf.info(),
                books: self.on_shelf(shelf).collect(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn book(id: &str, shelf: Shelf) -> Book {
        Book::new(id, shelf).with_title(format!("Book {id}"))
    }

    fn shelves_of(c: &Collection) -> Vec<(String, Shelf)> {
        c.iter().map(|b| (b.id.to_string(), b.shelf)).collect()
    }

    fn assert_invariants(c: &Collection) {
        let mut seen = HashSet::new();
        for b in c {
            assert!(b.shelf.is_tracked(), "untracked entry {}", b.id);
            assert!(seen.insert(b.id.clone()), "duplicate entry {}", b.id);
        }
    }

    // ── initialize ──────────────────────────────────────────────────

    #[test]
    fn initialize_drops_untracked_and_duplicates() {
        let c = Collection::initialize([
            book("1", Shelf::Read),
            book("2", Shelf::None),
            book("1", Shelf::WantToRead),
            book("3", Shelf::CurrentlyReading),
        ]);

        assert_eq!(
            shelves_of(&c),
            vec![("1".into(), Shelf::Read), ("3".into(), Shelf::CurrentlyReading)]
        );
        assert_invariants(&c);
    }

    // ── apply: scenarios ────────────────────────────────────────────

    #[test]
    fn relabels_tracked_book() {
        let c = Collection::initialize([book("1", Shelf::Read)]);
        let (next, transition) =
            c.apply(&ShelfChange::new(Book::new("1", Shelf::Read), Shelf::CurrentlyReading));

        assert_eq!(shelves_of(&next), vec![("1".into(), Shelf::CurrentlyReading)]);
        assert_eq!(
            transition,
            ShelfTransition::Moved {
                from: Shelf::Read,
                to: Shelf::CurrentlyReading
            }
        );
    }

    #[test]
    fn adds_untracked_book() {
        let c = Collection::new();
        let (next, transition) =
            c.apply(&ShelfChange::new(book("2", Shelf::None), Shelf::WantToRead));

        assert_eq!(shelves_of(&next), vec![("2".into(), Shelf::WantToRead)]);
        assert_eq!(next.get(&"2".into()).map(|b| b.title.as_str()), Some("Book 2"));
        assert_eq!(transition, ShelfTransition::Added { to: Shelf::WantToRead });
    }

    #[test]
    fn removes_book_moved_to_none() {
        let c = Collection::initialize([book("3", Shelf::WantToRead)]);
        let (next, transition) =
            c.apply(&ShelfChange::new(Book::new("3", Shelf::WantToRead), Shelf::None));

        assert!(next.is_empty());
        assert_eq!(transition, ShelfTransition::Removed { from: Shelf::WantToRead });
    }

    #[test]
    fn apply_leaves_source_untouched() {
        let c = Collection::initialize([book("1", Shelf::Read)]);
        let _ = c.apply(&ShelfChange::new(book("1", Shelf::Read), Shelf::None));
        assert_eq!(shelves_of(&c), vec![("1".into(), Shelf::Read)]);
    }

    // ── apply: properties ───────────────────────────────────────────

    fn seed() -> Collection {
        Collection::initialize([
            book("a", Shelf::CurrentlyReading),
            book("b", Shelf::WantToRead),
            book("c", Shelf::Read),
        ])
    }

    #[test]
    fn untracked_book_lands_exactly_once_on_every_shelf() {
        for target in Shelf::DISPLAYED {
            let (next, _) = seed().apply(&ShelfChange::new(book("z", Shelf::None), target));
            let hits: Vec<_> = next.iter().filter(|b| b.id.as_str() == "z").collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].shelf, target);
            assert_invariants(&next);
        }
    }

    #[test]
    fn tracked_book_is_relabelled_without_duplicates() {
        for target in Shelf::DISPLAYED {
            for id in ["a", "b", "c"] {
                let before = seed();
                let previous = before.shelf_of(&id.into());
                let (next, _) = before.apply(&ShelfChange::new(book(id, previous), target));
                assert_eq!(next.shelf_of(&id.into()), target);
                assert_eq!(next.len(), 3);
                assert_invariants(&next);
            }
        }
    }

    #[test]
    fn stale_untracked_intent_does_not_duplicate() {
        // A search result still says `none` although the book was added since.
        let (next, transition) = seed().apply(&ShelfChange::new(book("b", Shelf::None), Shelf::Read));
        assert_eq!(next.len(), 3);
        assert_eq!(next.shelf_of(&"b".into()), Shelf::Read);
        assert_eq!(
            transition,
            ShelfTransition::Moved {
                from: Shelf::WantToRead,
                to: Shelf::Read
            }
        );
    }

    #[test]
    fn absent_book_with_stale_shelf_is_appended() {
        // The intent says `read`, but the collection no longer holds the book.
        // Membership decides, not the shelf the intent carries.
        let (next, transition) =
            Collection::new().apply(&ShelfChange::new(book("5", Shelf::Read), Shelf::WantToRead));

        assert_eq!(shelves_of(&next), vec![("5".into(), Shelf::WantToRead)]);
        assert_eq!(transition, ShelfTransition::Added { to: Shelf::WantToRead });
        assert_invariants(&next);
    }

    #[test]
    fn moving_to_none_removes_every_tracked_book() {
        for id in ["a", "b", "c"] {
            let (next, _) = seed().apply(&ShelfChange::new(book(id, Shelf::Read), Shelf::None));
            assert!(!next.contains(&id.into()));
            assert_eq!(next.len(), 2);
        }
    }

    #[test]
    fn apply_is_idempotent() {
        for target in [Shelf::CurrentlyReading, Shelf::WantToRead, Shelf::Read, Shelf::None] {
            for id in ["a", "z"] {
                let change = ShelfChange::new(book(id, Shelf::None), target);
                let (once, _) = seed().apply(&change);
                let (twice, second) = once.apply(&change);
                assert_eq!(once, twice);
                assert_eq!(second.target(), target);
                assert!(matches!(second, ShelfTransition::Unchanged { .. }));
            }
        }
    }

    #[test]
    fn untracked_to_none_is_a_no_op() {
        let (next, transition) = seed().apply(&ShelfChange::new(book("z", Shelf::None), Shelf::None));
        assert_eq!(next, seed());
        assert_eq!(transition, ShelfTransition::Unchanged { shelf: Shelf::None });
    }

    // ── rollback ────────────────────────────────────────────────────

    #[test]
    fn rollback_restores_every_kind_of_transition() {
        let changes = [
            ShelfChange::new(book("z", Shelf::None), Shelf::Read),
            ShelfChange::new(book("a", Shelf::CurrentlyReading), Shelf::Read),
            ShelfChange::new(book("b", Shelf::WantToRead), Shelf::None),
            ShelfChange::new(book("c", Shelf::Read), Shelf::Read),
        ];

        for change in changes {
            let before = seed();
            let (after, _) = before.apply(&change);
            let restored = after.rollback(&before, &change.book.id);

            let mut expected = shelves_of(&before);
            let mut actual = shelves_of(&restored);
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected);
            assert_invariants(&restored);
        }
    }

    #[test]
    fn rollback_puts_back_original_metadata() {
        let before = seed();
        let (after, _) = before.apply(&ShelfChange::new(Book::new("b", Shelf::WantToRead), Shelf::None));
        let restored = after.rollback(&before, &"b".into());
        assert_eq!(restored.get(&"b".into()).map(|b| b.title.as_str()), Some("Book b"));
    }

    // ── annotate & grouping ─────────────────────────────────────────

    #[test]
    fn annotate_cross_references_by_id() {
        let results = vec![book("a", Shelf::None), book("z", Shelf::Read)];
        let annotated = seed().annotate(results);

        assert_eq!(annotated[0].shelf, Shelf::CurrentlyReading);
        assert_eq!(annotated[1].shelf, Shelf::None);
    }

    #[test]
    fn grouped_follows_display_order() {
        let c = Collection::initialize([
            book("r1", Shelf::Read),
            book("w1", Shelf::WantToRead),
            book("r2", Shelf::Read),
        ]);
        let groups = c.grouped();

        let summary: Vec<_> = groups
            .iter()
            .map(|g| (g.info.key, g.books.iter().map(|b| b.id.to_string()).collect::<Vec<_>>()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Shelf::CurrentlyReading, vec![]),
                (Shelf::WantToRead, vec!["w1".to_string()]),
                (Shelf::Read, vec!["r1".to_string(), "r2".to_string()]),
            ]
        );
    }

    #[test]
    fn classify_covers_every_pair() {
        use ShelfTransition as T;
        assert_eq!(T::classify(Shelf::None, Shelf::Read), T::Added { to: Shelf::Read });
        assert_eq!(T::classify(Shelf::Read, Shelf::None), T::Removed { from: Shelf::Read });
        assert_eq!(T::classify(Shelf::Read, Shelf::Read), T::Unchanged { shelf: Shelf::Read });
        assert_eq!(T::classify(Shelf::None, Shelf::None), T::Unchanged { shelf: Shelf::None });
        assert_eq!(
            T::classify(Shelf::WantToRead, Shelf::Read),
            T::Moved {
                from: Shelf::WantToRead,
                to: Shelf::Read
            }
        );
    }
}
