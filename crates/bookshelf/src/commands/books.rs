//! Book command handlers: list, show, move, remove.

use std::fmt::Write as _;

use tabled::Tabled;

use bookshelf_core::{Book, BookId, Controller, Shelf, ShelfGroup, ShelfOutcome, ShelfTransition};

use crate::cli::{GlobalOpts, ListArgs, MoveArgs, RemoveArgs, ShowArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Authors")]
    authors: String,
}

impl From<&Book> for BookRow {
    fn from(b: &Book) -> Self {
        Self {
            id: b.id.to_string(),
            title: util::or_dash(&b.title),
            authors: util::or_dash(&b.authors_display()),
        }
    }
}

fn title_of(book: &Book) -> &str {
    if book.title.is_empty() {
        book.id.as_str()
    } else {
        &book.title
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn grouped_table(groups: &[ShelfGroup<'_>], color: bool) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} ({})",
            output::shelf_label(group.info.key, color),
            group.books.len()
        );
        if group.books.is_empty() {
            let _ = writeln!(out, "  (no books)");
        } else {
            let rows: Vec<BookRow> = group.books.iter().map(|b| BookRow::from(*b)).collect();
            let _ = writeln!(out, "{}", output::render_table(&rows));
        }
    }
    out.trim_end().to_owned()
}

fn book_detail(book: &Book, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:       {}", book.id);
    let _ = writeln!(out, "Title:    {}", util::or_dash(&book.title));
    if let Some(ref subtitle) = book.subtitle {
        let _ = writeln!(out, "Subtitle: {subtitle}");
    }
    let _ = writeln!(out, "Authors:  {}", util::or_dash(&book.authors_display()));
    let _ = writeln!(out, "Shelf:    {}", output::shelf_label(book.shelf, color));
    if let Some(cover) = book.cover_url() {
        let _ = writeln!(out, "Cover:    {cover}");
    }
    out.trim_end().to_owned()
}

/// One-line description of what a shelf change did.
fn describe(outcome: &ShelfOutcome, title: &str, color: bool) -> String {
    let label = |shelf: Shelf| output::shelf_label(shelf, color);
    match outcome.transition {
        ShelfTransition::Added { to } => format!("Added '{title}' to {}", label(to)),
        ShelfTransition::Moved { from, to } => {
            format!("Moved '{title}' from {} to {}", label(from), label(to))
        }
        ShelfTransition::Removed { from } => format!("Removed '{title}' from {}", label(from)),
        ShelfTransition::Unchanged { shelf } if shelf.is_tracked() => {
            format!("'{title}' is already on {}", label(shelf))
        }
        ShelfTransition::Unchanged { .. } => format!("'{title}' is not on any shelf"),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(controller: &Controller, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let only = args.shelf.map(Shelf::from);
    if only == Some(Shelf::None) {
        return Err(CliError::Validation {
            field: "shelf".into(),
            reason: "'none' is not a shelf you can list; use search to find untracked books".into(),
        });
    }

    let collection = controller.collection();
    let groups: Vec<ShelfGroup<'_>> = collection
        .grouped()
        .into_iter()
        .filter(|g| only.is_none_or(|s| g.info.key == s))
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        groups.as_slice(),
        |gs| grouped_table(gs, color),
        |gs| {
            gs.iter()
                .flat_map(|g| g.books.iter().map(|b| b.id.to_string()))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(controller: &Controller, args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let book = controller.book(&BookId::from(args.id.as_str())).await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &book,
        |b| book_detail(b, color),
        |b| b.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn move_book(
    controller: &Controller,
    args: MoveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let book = controller.book(&BookId::from(args.id)).await?;
    change_and_report(controller, book, Shelf::from(args.shelf), global).await
}

pub async fn remove(
    controller: &Controller,
    args: RemoveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let book = controller.book(&BookId::from(args.id)).await?;
    if book.shelf.is_tracked()
        && !util::confirm(
            &format!(
                "Remove '{}' from {}?",
                title_of(&book),
                book.shelf.display_name()
            ),
            "remove",
            global.yes,
        )?
    {
        return Ok(());
    }
    change_and_report(controller, book, Shelf::None, global).await
}

async fn change_and_report(
    controller: &Controller,
    book: Book,
    target: Shelf,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let title = title_of(&book).to_owned();
    let outcome = controller.change_shelf(book, target).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| describe(o, &title, color),
        |o| o.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
