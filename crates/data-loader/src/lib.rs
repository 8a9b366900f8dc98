//! # Data Loader Crate
//!
//! This crate turns a film-catalog export into canonical records.
//!
//! ## Main Components
//!
//! - **types**: Cells, fields, raw rows, canonical records, conflict warnings
//! - **set**: Insertion-ordered set for the genre/format columns
//! - **parser**: Header mapping, whitespace normalization, row parsing
//! - **merge**: The row merger that folds duplicate rows together
//! - **source**: Ingesting a table into a serializable `CatalogSource`
//! - **error**: Error types for reading tables and saved catalogs
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CatalogSource;
//! use std::path::Path;
//!
//! // Ingest a table exported from the spreadsheet
//! let source = CatalogSource::load_table(Path::new("catalogue-2024-03-01.json"), None)?;
//!
//! println!(
//!     "{} records, {} conflicts",
//!     source.records.len(),
//!     source.warnings.len()
//! );
//!
//! // Store it for later
//! std::fs::write("catalog.json", source.to_json()?)?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod set;
pub mod parser;
pub mod merge;
pub mod source;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use merge::{merge_rows, MergeOutcome, RowMerger};
pub use parser::Table;
pub use set::OrderedSet;
pub use types::{
    CanonicalRecord,
    CatalogSource,
    Cell,
    Column,
    ConflictWarning,
    Field,
    FieldConflict,
    RawRow,
    RecordFields,
};
