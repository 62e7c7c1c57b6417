//! Shelf overview handler.

use serde::Serialize;
use tabled::Tabled;

use bookshelf_core::{Controller, Shelf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ShelfSummary {
    key: Shelf,
    name: &'static str,
    books: usize,
}

#[derive(Tabled)]
struct ShelfRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Books")]
    books: usize,
}

pub fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let collection = controller.collection();
    let summaries: Vec<ShelfSummary> = controller
        .shelves()
        .into_iter()
        .map(|info| ShelfSummary {
            key: info.key,
            name: info.name,
            books: collection.on_shelf(info.key).count(),
        })
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &summaries,
        |s| ShelfRow {
            key: s.key.key().into(),
            name: output::shelf_label(s.key, color),
            books: s.books,
        },
        |s| s.key.key().into(),
    )?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        if let Some(loaded) = controller.store().last_full_load() {
            eprintln!("Loaded from catalog at {}", loaded.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    Ok(())
}
