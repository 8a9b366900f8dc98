//! The FilterPipeline chains independent filters.
//!
//! An entry is kept only if every filter keeps it. Filters run in the
//! order they were added, and an entry rejected by one filter is never
//! shown to the next.

use crate::traits::Filter;
use catalog::Entry;
use tracing::debug;

/// Chains multiple filters together into a logical AND.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(SearchFilter::new(Matcher::literal("powell")?, SearchField::People))
///     .add_filter(FormatFilter::new("35mm"));
///
/// let matching = pipeline.apply(catalog.entries());
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add an already boxed filter
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a single entry passes every filter (short-circuiting)
    pub fn keeps(&self, entry: &Entry) -> bool {
        self.filters.iter().all(|filter| filter.keep(entry))
    }

    /// Apply all filters in sequence, preserving input order.
    ///
    /// ## Algorithm
    /// 1. Start with every input entry
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Keep the entries the filter accepts
    ///    c. Log output count
    /// 3. Return the survivors
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let mut current: Vec<&Entry> = entries.iter().collect();
        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current.retain(|entry| filter.keep(entry));
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{CertificateFilter, GenreFilter};
    use data_loader::{CanonicalRecord, OrderedSet, RecordFields};

    fn entry(title: &str, certificate: &str, genres: &[&str]) -> Entry {
        Entry::new(&CanonicalRecord {
            fields: RecordFields {
                title: Some(title.into()),
                alphabetical_title: Some(title.into()),
                certificate: Some(certificate.into()),
                ..Default::default()
            },
            genre: genres.iter().map(|g| g.to_string()).collect::<OrderedSet<_>>(),
            film_format: OrderedSet::new(),
        })
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let entries = vec![entry("Kes", "PG", &["Drama"]), entry("Rififi", "15", &["Crime"])];

        let filtered = pipeline.apply(&entries);
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_filters_combine_with_and() {
        let entries = vec![
            entry("Kes", "PG", &["Drama"]),
            entry("Rififi", "15", &["Crime", "Drama"]),
            entry("Peeping Tom", "18", &["Horror"]),
        ];

        let pipeline = FilterPipeline::new()
            .add_filter(GenreFilter::new("Drama"))
            .add_filter(CertificateFilter::new("15"));

        let filtered = pipeline.apply(&entries);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title(), "Rififi");
        assert!(pipeline.keeps(&entries[1]));
        assert!(!pipeline.keeps(&entries[0]));
    }
}
