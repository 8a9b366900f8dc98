//! Query engine for searching, filtering and sorting catalog entries.
//!
//! This crate provides:
//! - Filter trait and implementations for entry filtering
//! - FilterPipeline for composing filters
//! - Query, which turns a search term, facet filters and a sort key into
//!   an ordered result list
//!
//! ## Architecture
//! A query runs in two stages:
//! 1. Filters remove entries that do not match (search term, certificate,
//!    format, genre, country, picture type)
//! 2. The survivors are stable-sorted by title, certificate, duration or year
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FacetFilter, Query, SearchField, SortKey};
//!
//! let query = Query::new()
//!     .with_search("powell", SearchField::People)
//!     .with_filter(FacetFilter { format: Some("35mm".into()), ..Default::default() })
//!     .with_sort(SortKey::Year, false);
//!
//! for entry in query.run(&catalog) {
//!     println!("{}", entry.title());
//! }
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod query;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use filters::SearchField;
pub use query::{FacetFilter, Query, Search, Sort, SortKey};
