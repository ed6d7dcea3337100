//! Terminal rendering
//!
//! Turns page output into text. Functions return strings so the REPL and
//! the one-shot mode print the same thing.

use crate::cli::page::{Panel, Rendered, Sidebar, CAPTION, CATALOG_UNAVAILABLE, TITLE};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Title and caption
pub fn header() -> String {
    format!("{}\n{}\n", TITLE.bold(), CAPTION.dim())
}

/// The catalog preview boxed in a table
pub fn sidebar(sidebar: &Sidebar) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Schema Catalog")]);

    match sidebar {
        Sidebar::Preview(text) => {
            table.add_row(vec![Cell::new(text)]);
        }
        Sidebar::Unavailable(diagnostic) => {
            table.add_row(vec![Cell::new(CATALOG_UNAVAILABLE)]);
            table.add_row(vec![Cell::new(diagnostic)]);
        }
    }

    table.to_string()
}

/// Panels of one response, SQL fenced and errors highlighted
pub fn rendered(rendered: &Rendered) -> String {
    let mut out = String::new();
    for panel in rendered.panels() {
        match panel {
            Panel::Sql(sql) => {
                out.push_str(&format!("```sql\n{}\n```\n", sql));
            }
            Panel::Error(message) => {
                out.push_str(&format!("{}\n", format!("Error: {}", message).red()));
            }
        }
    }
    out
}
