//! Core traits for the query pipeline.
//!
//! This module defines the Filter trait that lets independent predicates
//! be composed into a single query.

use catalog::Entry;

/// A single predicate over catalog entries.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows a built pipeline to be shared across threads
/// - Filters only read the entry; they never mutate the catalog
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the entry passes this filter
    fn keep(&self, entry: &Entry) -> bool;
}
