use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::collector::{Fact, Listing};

/// Column name appended to the header for the extracted fact.
pub const FACT_COLUMN: &str = "BirthYear";

/// Append the fact column to the header and every data row.
///
/// Returns the full table, header first. Rows whose fact is absent get an
/// empty trailing cell so every row keeps the header's width, and the miss is
/// logged with the row's name (its second cell).
pub fn merge_rows(listing: Listing) -> Vec<Vec<String>> {
    let Listing {
        mut header,
        rows,
        facts,
    } = listing;

    let mut table = Vec::with_capacity(rows.len() + 1);
    header.push(FACT_COLUMN.to_string());
    table.push(header);

    for (mut row, fact) in rows.into_iter().zip(facts) {
        match fact {
            Fact::Found(year) => row.push(year),
            Fact::NotFound => {
                log::warn!("{}: birth year not found", row_name(&row));
                row.push(String::new());
            }
            Fact::Unavailable => {
                log::warn!("{}: detail page unavailable", row_name(&row));
                row.push(String::new());
            }
        }
        table.push(row);
    }

    table
}

fn row_name(row: &[String]) -> &str {
    row.get(1).map(String::as_str).unwrap_or("<unnamed row>")
}

/// Render the table as separator-joined lines.
///
/// Cells containing the separator, a quote or a newline are quoted CSV-style
/// with embedded quotes doubled; all other cells render verbatim.
pub fn render_delimited(rows: &[Vec<String>], separator: &str) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_cell(cell, separator))
                .collect::<Vec<_>>()
                .join(separator)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_cell<'a>(cell: &'a str, separator: &str) -> Cow<'a, str> {
    if cell.contains(separator) || cell.contains('"') || cell.contains('\n') {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Write the rendered text as UTF-8, creating missing parent directories.
pub fn save_csv(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
