//! Building, saving and reloading a `CatalogSource`.
//!
//! `CatalogSource::from_table` is the main ingestion entry point: parse the
//! grid, merge duplicate rows, and package the result with the snapshot date
//! and column mapping. The JSON helpers let the result be stored and loaded
//! again without re-running the merge.

use crate::error::Result;
use crate::merge::merge_rows;
use crate::parser::{self, Table};
use crate::types::CatalogSource;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

impl CatalogSource {
    /// Ingest a raw table.
    ///
    /// Steps:
    /// 1. Map the header row to field keys
    /// 2. Parse and whitespace-normalize every data row
    /// 3. Merge duplicate rows into canonical records
    #[instrument(skip(table), fields(rows = table.len()))]
    pub fn from_table(table: &Table, date: Option<String>) -> Self {
        let (columns, rows) = parser::parse_rows(table);
        let outcome = merge_rows(rows);

        info!(
            "Built catalog snapshot {} with {} records",
            date.as_deref().unwrap_or("(undated)"),
            outcome.records.len()
        );

        Self {
            date,
            columns,
            records: outcome.records,
            warnings: outcome.warnings,
        }
    }

    /// Read a JSON table from disk and ingest it.
    ///
    /// The snapshot date falls back to a `YYYY-MM-DD` found in the file name.
    pub fn load_table(path: &Path, date: Option<String>) -> Result<Self> {
        let table = parser::read_table(path)?;
        let date = date.or_else(|| {
            path.file_name()
                .and_then(|name| parser::snapshot_date_from_name(&name.to_string_lossy()))
        });
        Ok(Self::from_table(&table, date))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a catalog document previously written with `to_json`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(crate::error::DataLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
