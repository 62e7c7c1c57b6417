//! Catalog search handler.

use tabled::Tabled;

use bookshelf_core::{Book, Controller};

use crate::cli::{GlobalOpts, OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Authors")]
    authors: String,
    #[tabled(rename = "Shelf")]
    shelf: String,
}

impl ResultRow {
    fn new(book: &Book, color: bool) -> Self {
        Self {
            id: book.id.to_string(),
            title: util::or_dash(&book.title),
            authors: util::or_dash(&book.authors_display()),
            shelf: if book.shelf.is_tracked() {
                output::shelf_label(book.shelf, color)
            } else {
                "-".into()
            },
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: &SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = args.query.join(" ");
    let results = controller.search(&query).await?;

    if results.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No books match '{query}'");
        }
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &results,
        |b| ResultRow::new(b, color),
        |b| b.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
