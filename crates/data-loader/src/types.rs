//! Core data types for the film catalog export.
//!
//! This module defines the shapes that flow between the table reader, the
//! row merger and the serialized catalog document:
//! - `Cell`: one spreadsheet cell (text or number)
//! - `Field`: the known columns, keyed by their camelCase name
//! - `RawRow` / `CanonicalRecord`: one sheet line, and the merged record
//! - `ConflictWarning`: a same-title merge that was rejected
//! - `CatalogSource`: the full serializable state

use crate::set::OrderedSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Cells
// =============================================================================

/// A single non-empty spreadsheet cell.
///
/// Empty cells are represented as `None` wherever a cell is optional, so a
/// row is a sequence of `Option<Cell>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// The text of a `Text` cell; `None` for numbers
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }

    /// True for an empty string, zero or NaN.
    ///
    /// The export treats these the same as a missing cell when deriving facets.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.is_empty(),
            Cell::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }
}

impl fmt::Display for Cell {
    /// Integral numbers print without a fractional part (`90`, not `90.0`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

// =============================================================================
// Fields
// =============================================================================

/// The columns the catalog understands.
///
/// Every field except `Genre` and `FilmFormat` is scalar: duplicate rows are
/// expected to agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    AlphabeticalTitle,
    Cast,
    Certificate,
    Country,
    Duration,
    Year,
    Director,
    Picture,
    ShortSynopsis,
    OriginalTitle,
    LongSynopsis,
    Genre,
    FilmFormat,
}

impl Field {
    /// Fields compared when deciding whether two rows describe the same record
    pub const SCALAR: [Field; 12] = [
        Field::Title,
        Field::AlphabeticalTitle,
        Field::Cast,
        Field::Certificate,
        Field::Country,
        Field::Duration,
        Field::Year,
        Field::Director,
        Field::Picture,
        Field::ShortSynopsis,
        Field::OriginalTitle,
        Field::LongSynopsis,
    ];

    /// The camelCase key used in column mappings and serialized records
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::AlphabeticalTitle => "alphabeticalTitle",
            Field::Cast => "cast",
            Field::Certificate => "certificate",
            Field::Country => "country",
            Field::Duration => "duration",
            Field::Year => "year",
            Field::Director => "director",
            Field::Picture => "picture",
            Field::ShortSynopsis => "shortSynopsis",
            Field::OriginalTitle => "originalTitle",
            Field::LongSynopsis => "longSynopsis",
            Field::Genre => "genre",
            Field::FilmFormat => "filmFormat",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::SCALAR
            .into_iter()
            .chain([Field::Genre, Field::FilmFormat])
            .find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Rows and Records
// =============================================================================

/// The scalar columns shared by raw rows and canonical records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub title: Option<Cell>,
    pub alphabetical_title: Option<Cell>,
    pub cast: Option<Cell>,
    pub certificate: Option<Cell>,
    pub country: Option<Cell>,
    pub duration: Option<Cell>,
    pub year: Option<Cell>,
    pub director: Option<Cell>,
    pub picture: Option<Cell>,
    pub short_synopsis: Option<Cell>,
    pub original_title: Option<Cell>,
    pub long_synopsis: Option<Cell>,
}

impl RecordFields {
    /// Borrow the value of a scalar field. Set-valued fields always return `None`.
    pub fn get(&self, field: Field) -> Option<&Cell> {
        match field {
            Field::Title => self.title.as_ref(),
            Field::AlphabeticalTitle => self.alphabetical_title.as_ref(),
            Field::Cast => self.cast.as_ref(),
            Field::Certificate => self.certificate.as_ref(),
            Field::Country => self.country.as_ref(),
            Field::Duration => self.duration.as_ref(),
            Field::Year => self.year.as_ref(),
            Field::Director => self.director.as_ref(),
            Field::Picture => self.picture.as_ref(),
            Field::ShortSynopsis => self.short_synopsis.as_ref(),
            Field::OriginalTitle => self.original_title.as_ref(),
            Field::LongSynopsis => self.long_synopsis.as_ref(),
            Field::Genre | Field::FilmFormat => None,
        }
    }

    /// Mutable slot for a scalar field; `None` for set-valued fields
    pub fn slot_mut(&mut self, field: Field) -> Option<&mut Option<Cell>> {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::AlphabeticalTitle => &mut self.alphabetical_title,
            Field::Cast => &mut self.cast,
            Field::Certificate => &mut self.certificate,
            Field::Country => &mut self.country,
            Field::Duration => &mut self.duration,
            Field::Year => &mut self.year,
            Field::Director => &mut self.director,
            Field::Picture => &mut self.picture,
            Field::ShortSynopsis => &mut self.short_synopsis,
            Field::OriginalTitle => &mut self.original_title,
            Field::LongSynopsis => &mut self.long_synopsis,
            Field::Genre | Field::FilmFormat => return None,
        };
        Some(slot)
    }

    /// Scalar fields whose values differ between `self` and `other`, in column order
    pub fn differing_fields(&self, other: &RecordFields) -> Vec<Field> {
        Field::SCALAR
            .into_iter()
            .filter(|&field| self.get(field) != other.get(field))
            .collect()
    }
}

/// One spreadsheet line.
///
/// A title with several genres or formats appears on several rows, each
/// carrying a single `genre` / `film_format` value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub fields: RecordFields,
    pub genre: Option<String>,
    pub film_format: Option<String>,
}

/// The merged unit produced by the row merger.
///
/// `genre` and `film_format` accumulate the values of every row merged into
/// the record, without duplicates, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    #[serde(flatten)]
    pub fields: RecordFields,
    #[serde(default)]
    pub genre: OrderedSet<String>,
    #[serde(default)]
    pub film_format: OrderedSet<String>,
}

impl CanonicalRecord {
    /// Start a new record from a row, seeding the sets from its single values
    pub fn from_row(row: RawRow) -> Self {
        let mut record = Self {
            fields: row.fields,
            genre: OrderedSet::new(),
            film_format: OrderedSet::new(),
        };
        record.absorb_sets(row.genre, row.film_format);
        record
    }

    /// Add a row's genre and format, skipping empty values
    pub fn absorb_sets(&mut self, genre: Option<String>, film_format: Option<String>) {
        if let Some(genre) = genre.filter(|g| !g.is_empty()) {
            self.genre.insert(genre);
        }
        if let Some(format) = film_format.filter(|f| !f.is_empty()) {
            self.film_format.insert(format);
        }
    }
}

// =============================================================================
// Warnings and the Catalog Document
// =============================================================================

/// One field on which two same-title rows disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConflict {
    pub field: Field,
    /// Value on the row being merged
    pub incoming: Option<Cell>,
    /// Value on the record that was kept
    pub retained: Option<Cell>,
}

/// A same-title merge that was rejected because scalar fields differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub title: Option<Cell>,
    pub fields: Vec<FieldConflict>,
}

/// A header as it appeared in the sheet, and the key it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    pub key: String,
}

/// The full serializable state of a catalog snapshot.
///
/// Reloading this document rebuilds an equivalent catalog without running
/// the row merger again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSource {
    /// ISO-like date identifying the snapshot, when known
    pub date: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    pub records: Vec<CanonicalRecord>,
    #[serde(default)]
    pub warnings: Vec<ConflictWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(90.0).to_string(), "90");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::from("Drama").to_string(), "Drama");
    }

    #[test]
    fn test_cell_blank() {
        assert!(Cell::from("").is_blank());
        assert!(Cell::Number(0.0).is_blank());
        assert!(!Cell::Number(12.0).is_blank());
        assert!(!Cell::from(" ").is_blank());
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::from_key("filmFormat"), Some(Field::FilmFormat));
        assert_eq!(Field::from_key("alphabeticalTitle"), Some(Field::AlphabeticalTitle));
        assert_eq!(Field::from_key("runtime"), None);
        for field in Field::SCALAR {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
    }

    #[test]
    fn test_differing_fields() {
        let a = RecordFields {
            title: Some("Brief Encounter".into()),
            duration: Some(Cell::Number(86.0)),
            ..Default::default()
        };
        let mut b = a.clone();
        assert!(a.differing_fields(&b).is_empty());

        b.duration = Some(Cell::Number(88.0));
        b.year = Some(Cell::Number(1945.0));
        assert_eq!(a.differing_fields(&b), vec![Field::Duration, Field::Year]);
    }

    #[test]
    fn test_record_serializes_sets_as_lists() {
        let mut record = CanonicalRecord::from_row(RawRow {
            fields: RecordFields {
                title: Some("Kes".into()),
                year: Some(Cell::Number(1969.0)),
                ..Default::default()
            },
            genre: Some("Drama".to_string()),
            film_format: None,
        });
        record.absorb_sets(Some("Drama".to_string()), Some("DCP".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Kes");
        assert_eq!(json["genre"], serde_json::json!(["Drama"]));
        assert_eq!(json["filmFormat"], serde_json::json!(["DCP"]));

        let back: CanonicalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
