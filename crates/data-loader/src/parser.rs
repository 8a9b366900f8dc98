//! Parser for the tabular catalog export.
//!
//! The export arrives as a grid: the first row holds the column headers and
//! every later row holds one title/genre/format combination. This module:
//! - maps headers to camelCase field keys ("Film Format" -> "filmFormat")
//! - normalizes whitespace in text cells
//! - turns each data row into a `RawRow`
//! - reads a grid from a JSON document on disk

use crate::error::{DataLoadError, Result};
use crate::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A grid of cells as handed over by the spreadsheet reader
pub type Table = Vec<Vec<Option<Cell>>>;

static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([a-z])").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SNAPSHOT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Read a table from a JSON file holding an array of rows.
///
/// Each row is an array of strings, numbers or nulls.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path)?;
    let table: Table = serde_json::from_str(&text)?;
    debug!("Read {} table rows from {}", table.len(), path.display());
    Ok(table)
}

/// Map a header to its field key.
///
/// The header is lower-cased, then each space followed by a letter is
/// dropped and the letter upper-cased.
///
/// Example: "Film Format" -> "filmFormat"
///          "Alphabetical Title" -> "alphabeticalTitle"
pub fn column_key(header: &str) -> String {
    let lower = header.to_lowercase();
    WORD_START
        .replace_all(&lower, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Build the column mapping from the header row
pub fn columns(headers: &[Option<Cell>]) -> Vec<Column> {
    headers
        .iter()
        .map(|header| {
            let title = header.as_ref().map(|h| h.to_string()).unwrap_or_default();
            let key = column_key(&title);
            Column { title, key }
        })
        .collect()
}

/// Tidy the line breaks in a text cell.
///
/// Whitespace-only lines between two newlines are emptied, then runs of
/// three or more newlines collapse to exactly two.
pub fn normalize_whitespace(text: &str) -> String {
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len().saturating_sub(1);
    let cleaned: Vec<&str> = segments
        .iter()
        .enumerate()
        .map(|(ix, segment)| {
            // Only segments with a newline on both sides count as lines
            if ix > 0 && ix < last && segment.chars().all(char::is_whitespace) {
                ""
            } else {
                segment
            }
        })
        .collect();
    let joined = cleaned.join("\n");
    EXCESS_NEWLINES.replace_all(&joined, "\n\n").into_owned()
}

fn normalize_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(text) => Cell::Text(normalize_whitespace(&text)),
        number => number,
    }
}

/// Parse the data rows of a table against its header row.
///
/// Cells under headers that map to no known field are dropped. Short rows
/// are padded with empty cells and surplus cells are ignored.
pub fn parse_rows(table: &[Vec<Option<Cell>>]) -> (Vec<Column>, Vec<RawRow>) {
    let Some((headers, data)) = table.split_first() else {
        return (Vec::new(), Vec::new());
    };

    let columns = columns(headers);
    let fields: Vec<Option<Field>> = columns
        .iter()
        .map(|column| {
            let field = Field::from_key(&column.key);
            if field.is_none() {
                debug!("Ignoring unknown column {:?} ({})", column.title, column.key);
            }
            field
        })
        .collect();

    let rows = data
        .iter()
        .map(|cells| {
            let mut row = RawRow::default();
            for (ix, field) in fields.iter().enumerate() {
                let Some(field) = *field else { continue };
                let cell = cells.get(ix).cloned().flatten().map(normalize_cell);
                match field {
                    Field::Genre => row.genre = cell.map(|c| c.to_string()),
                    Field::FilmFormat => row.film_format = cell.map(|c| c.to_string()),
                    scalar => {
                        if let Some(slot) = row.fields.slot_mut(scalar) {
                            *slot = cell;
                        }
                    }
                }
            }
            row
        })
        .collect();

    (columns, rows)
}

/// Extract the snapshot date from a source file name.
///
/// Example: "bfi-distribution-catalogue-2024-03-01.xlsx" -> Some("2024-03-01")
pub fn snapshot_date_from_name(name: &str) -> Option<String> {
    SNAPSHOT_DATE.find(name).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<Cell> {
        Some(Cell::from(s))
    }

    #[test]
    fn test_column_key() {
        assert_eq!(column_key("Film Format"), "filmFormat");
        assert_eq!(column_key("Alphabetical Title"), "alphabeticalTitle");
        assert_eq!(column_key("Short Synopsis"), "shortSynopsis");
        assert_eq!(column_key("Title"), "title");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a\n  \nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\n \t\n \n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\nb"), "a\nb");
        // Leading and trailing whitespace is not between two newlines
        assert_eq!(normalize_whitespace("  a\n  "), "  a\n  ");
    }

    #[test]
    fn test_parse_rows() {
        let table: Table = vec![
            vec![text("Title"), text("Year"), text("Genre"), text("Film Format"), text("Notes")],
            vec![text("Kes"), Some(Cell::Number(1969.0)), text("Drama"), text("DCP"), text("x")],
            vec![text("If...."), text("1968")],
            vec![text("Kes"), text("1969"), text("Drama"), text("DCP"), text("x"), text("stray"), text("cells")],
        ];

        let (columns, rows) = parse_rows(&table);
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[3].key, "filmFormat");
        assert_eq!(columns[4].key, "notes");
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].fields.title, text("Kes"));
        assert_eq!(rows[0].fields.year, Some(Cell::Number(1969.0)));
        assert_eq!(rows[0].genre.as_deref(), Some("Drama"));
        assert_eq!(rows[0].film_format.as_deref(), Some("DCP"));

        assert_eq!(rows[1].fields.year, text("1968"));
        assert_eq!(rows[1].genre, None);

        // Cells past the last header are dropped
        assert_eq!(rows[2].fields.year, text("1969"));
        assert_eq!(rows[2].film_format.as_deref(), Some("DCP"));
    }

    #[test]
    fn test_parse_empty_table() {
        let (columns, rows) = parse_rows(&[]);
        assert!(columns.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_snapshot_date() {
        assert_eq!(
            snapshot_date_from_name("catalogue-2024-03-01.xlsx").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(snapshot_date_from_name("catalogue.xlsx"), None);
    }
}
