//! Row merging: collapse duplicate sheet rows into canonical records.
//!
//! The export repeats a title once per genre/format combination. Rows that
//! agree on every scalar field are folded into one record whose genre and
//! format sets accumulate across the rows. Rows that share a title but
//! disagree on a scalar field are kept as a separate record and reported.
//!
//! ## Algorithm
//! For each row, in sheet order:
//! 1. Look up the records already accepted under the row's title, newest first
//! 2. A record differing on some scalar field produces a `ConflictWarning`
//!    and the scan moves on to the next older record
//! 3. The first record matching on every scalar field absorbs the row's
//!    genre/format and the scan stops
//! 4. If nothing matched, the row becomes a new record
//!
//! The first-seen value always wins: a conflicting row never overwrites or
//! feeds into the record it conflicts with.

use crate::types::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Records and warnings produced by a finished merge
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub records: Vec<CanonicalRecord>,
    pub warnings: Vec<ConflictWarning>,
}

/// Sequential accumulator for the row merge.
///
/// Candidate order is first-seen order, so rows must be pushed in sheet
/// order from a single thread for the output to be deterministic.
#[derive(Debug, Default)]
pub struct RowMerger {
    records: Vec<CanonicalRecord>,
    /// Positions in `records`, keyed by title display text, oldest first
    by_title: HashMap<String, Vec<usize>>,
    warnings: Vec<ConflictWarning>,
    rows_seen: usize,
}

impl RowMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one row into the accumulated records
    pub fn push(&mut self, row: RawRow) {
        self.rows_seen += 1;
        let key = title_key(&row.fields);

        let mut matched = None;
        if let Some(positions) = self.by_title.get(&key) {
            for &pos in positions.iter().rev() {
                let candidate = &self.records[pos];
                // The key is display text, so a numeric and a textual title can share it
                if candidate.fields.title != row.fields.title {
                    continue;
                }

                let differing = row.fields.differing_fields(&candidate.fields);
                if differing.is_empty() {
                    matched = Some(pos);
                    break;
                }

                debug!(
                    "Row {} conflicts with an earlier record for {:?} on {:?}",
                    self.rows_seen, key, differing
                );
                self.warnings.push(ConflictWarning {
                    title: candidate.fields.title.clone(),
                    fields: differing
                        .into_iter()
                        .map(|field| FieldConflict {
                            field,
                            incoming: row.fields.get(field).cloned(),
                            retained: candidate.fields.get(field).cloned(),
                        })
                        .collect(),
                });
            }
        }

        match matched {
            Some(pos) => self.records[pos].absorb_sets(row.genre, row.film_format),
            None => {
                self.by_title
                    .entry(key)
                    .or_insert_with(Vec::new)
                    .push(self.records.len());
                self.records.push(CanonicalRecord::from_row(row));
            }
        }
    }

    /// Number of records accepted so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> MergeOutcome {
        info!(
            "Merged {} rows into {} records ({} conflicts)",
            self.rows_seen,
            self.records.len(),
            self.warnings.len()
        );
        MergeOutcome {
            records: self.records,
            warnings: self.warnings,
        }
    }
}

impl Extend<RawRow> for RowMerger {
    fn extend<I: IntoIterator<Item = RawRow>>(&mut self, rows: I) {
        for row in rows {
            self.push(row);
        }
    }
}

/// Merge a full sequence of rows in one go
pub fn merge_rows(rows: impl IntoIterator<Item = RawRow>) -> MergeOutcome {
    let mut merger = RowMerger::new();
    merger.extend(rows);
    merger.finish()
}

fn title_key(fields: &RecordFields) -> String {
    fields
        .title
        .as_ref()
        .map(|title| title.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, duration: f64, genre: Option<&str>, format: Option<&str>) -> RawRow {
        RawRow {
            fields: RecordFields {
                title: Some(title.into()),
                alphabetical_title: Some(title.into()),
                duration: Some(Cell::Number(duration)),
                ..Default::default()
            },
            genre: genre.map(str::to_string),
            film_format: format.map(str::to_string),
        }
    }

    fn strings(set: &crate::set::OrderedSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_same_fields_merge_genres_in_order() {
        let outcome = merge_rows(vec![
            row("Kes", 110.0, Some("Drama"), Some("DCP")),
            row("Kes", 110.0, Some("Family"), Some("DCP")),
            row("Kes", 110.0, Some("Drama"), Some("35mm")),
        ]);

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.warnings.is_empty());
        assert_eq!(strings(&outcome.records[0].genre), vec!["Drama", "Family"]);
        assert_eq!(strings(&outcome.records[0].film_format), vec!["DCP", "35mm"]);
    }

    #[test]
    fn test_differing_duration_produces_conflict() {
        let outcome = merge_rows(vec![
            row("Kes", 110.0, Some("Drama"), None),
            row("Kes", 112.0, Some("Family"), None),
        ]);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);

        let warning = &outcome.warnings[0];
        assert_eq!(warning.title, Some("Kes".into()));
        assert_eq!(warning.fields.len(), 1);
        assert_eq!(warning.fields[0].field, Field::Duration);
        assert_eq!(warning.fields[0].incoming, Some(Cell::Number(112.0)));
        assert_eq!(warning.fields[0].retained, Some(Cell::Number(110.0)));

        // The conflicting row's genre is not merged into the first record
        assert_eq!(strings(&outcome.records[0].genre), vec!["Drama"]);
        assert_eq!(strings(&outcome.records[1].genre), vec!["Family"]);
    }

    #[test]
    fn test_scan_reaches_older_variants() {
        let outcome = merge_rows(vec![
            row("Kes", 110.0, Some("Drama"), None),
            row("Kes", 112.0, Some("Family"), None),
            row("Kes", 110.0, Some("Classic"), None),
        ]);

        // Third row conflicts with the newer variant but merges into the older one
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(strings(&outcome.records[0].genre), vec!["Drama", "Classic"]);
        assert_eq!(strings(&outcome.records[1].genre), vec!["Family"]);
    }

    #[test]
    fn test_first_seen_order_and_empty_values() {
        let outcome = merge_rows(vec![
            row("Kes", 110.0, Some(""), None),
            row("Brief Encounter", 86.0, None, Some("DCP")),
            row("Kes", 110.0, None, Some("")),
        ]);

        let titles: Vec<String> = outcome
            .records
            .iter()
            .map(|r| r.fields.title.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["Kes", "Brief Encounter"]);
        assert!(outcome.records[0].genre.is_empty());
        assert!(outcome.records[0].film_format.is_empty());
    }

    #[test]
    fn test_numeric_and_text_titles_do_not_merge() {
        let mut numeric = row("1984", 113.0, Some("Drama"), None);
        numeric.fields.title = Some(Cell::Number(1984.0));

        let outcome = merge_rows(vec![numeric, row("1984", 113.0, Some("Sci-Fi"), None)]);

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_no_values_lost_across_batch() {
        let rows = vec![
            row("A", 90.0, Some("Drama"), Some("DCP")),
            row("B", 80.0, Some("Horror"), Some("35mm")),
            row("A", 90.0, Some("Comedy"), Some("DCP")),
            row("B", 80.0, Some("Horror"), Some("Blu-ray")),
            row("A", 90.0, Some("Drama"), Some("Blu-ray")),
        ];
        let mut merger = RowMerger::new();
        merger.extend(rows);
        assert_eq!(merger.len(), 2);

        let outcome = merger.finish();
        assert_eq!(strings(&outcome.records[0].genre), vec!["Drama", "Comedy"]);
        assert_eq!(strings(&outcome.records[0].film_format), vec!["DCP", "Blu-ray"]);
        assert_eq!(strings(&outcome.records[1].genre), vec!["Horror"]);
        assert_eq!(strings(&outcome.records[1].film_format), vec!["35mm", "Blu-ray"]);
    }
}
