//! # Catalog Crate
//!
//! Turns canonical records into searchable, sortable entries.
//!
//! ## Components
//!
//! ### Facet Derivation (`derive`)
//! Pure functions that parse free-text cells into typed lists:
//! directors, cast, countries, picture types, durations and years.
//!
//! ### Entry (`entry`, `matching`, `compare`)
//! One record plus its facets, with diacritic-tolerant matchers, synopsis
//! highlighting and the comparators used for sorting.
//!
//! ### Catalog (`catalog`)
//! All entries of a snapshot and the distinct facet values across them.
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, Matcher};
//! use data_loader::CatalogSource;
//! use std::path::Path;
//!
//! let catalog = Catalog::new(CatalogSource::load(Path::new("catalog.json"))?);
//!
//! let matcher = Matcher::literal("powell")?;
//! for entry in catalog.entries().iter().filter(|e| e.matches_person(&matcher)) {
//!     println!("{} ({:?})", entry.title(), entry.years().list);
//! }
//! ```

// Public modules
pub mod error;
pub mod derive;
pub mod matching;
pub mod entry;
pub mod compare;
pub mod catalog;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogFacets};
pub use compare::{certificate_rank, CERTIFICATES};
pub use derive::{Derived, Synopsis};
pub use entry::Entry;
pub use error::{CatalogError, Result};
pub use matching::{Matcher, Segment};
