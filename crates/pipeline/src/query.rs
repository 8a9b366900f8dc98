//! Query execution: search, facet filters and sorting over a catalog.
//!
//! ## Algorithm
//! 1. Build an ordered list of independent filters:
//!    a. a search filter, when a non-empty term is given
//!    b. one filter per requested facet (certificate, format, genre,
//!       country, picture)
//! 2. Keep the entries every filter accepts, in canonical record order
//! 3. Stable-sort the survivors by the requested key, if any
//!
//! The catalog itself is never modified; results borrow from it.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::*;
use catalog::{Catalog, Entry, Matcher, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

/// The comparator a query sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Title,
    Certificate,
    Duration,
    Year,
}

impl SortKey {
    pub fn compare(self, a: &Entry, b: &Entry, desc: bool) -> Ordering {
        match self {
            SortKey::Title => a.compare_title(b, desc),
            SortKey::Certificate => a.compare_certificate(b, desc),
            SortKey::Duration => a.compare_duration(b, desc),
            SortKey::Year => a.compare_year(b, desc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    #[serde(default)]
    pub desc: bool,
}

/// A search term and the part of each entry it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub term: String,
    #[serde(default)]
    pub field: SearchField,
    /// Treat `term` as a regular expression instead of literal text
    #[serde(default)]
    pub regex: bool,
}

impl Search {
    fn matcher(&self) -> Result<Matcher> {
        if self.regex {
            Matcher::pattern(&self.term)
        } else {
            Matcher::literal(&self.term)
        }
    }
}

/// Exact-match facet filters; `None` means "any"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetFilter {
    pub certificate: Option<String>,
    pub format: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub picture: Option<String>,
}

/// A complete catalog query.
///
/// The default query has no search, no filters and no sort, and returns
/// every entry in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub sort: Option<Sort>,
    pub search: Option<Search>,
    pub filter: FacetFilter,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>, field: SearchField) -> Self {
        self.search = Some(Search {
            term: term.into(),
            field,
            regex: false,
        });
        self
    }

    pub fn with_sort(mut self, key: SortKey, desc: bool) -> Self {
        self.sort = Some(Sort { key, desc });
        self
    }

    pub fn with_filter(mut self, filter: FacetFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The search, unless its term is empty
    pub fn active_search(&self) -> Option<&Search> {
        self.search.as_ref().filter(|s| !s.term.is_empty())
    }

    /// Compile the search term and assemble the filters.
    ///
    /// Fails only when a regular-expression search term does not compile.
    pub fn pipeline(&self) -> Result<FilterPipeline> {
        let mut pipeline = FilterPipeline::new();

        if let Some(search) = self.active_search() {
            pipeline.push(Box::new(SearchFilter::new(search.matcher()?, search.field)));
        }

        let facets = &self.filter;
        if let Some(certificate) = &facets.certificate {
            pipeline.push(Box::new(CertificateFilter::new(certificate.as_str())));
        }
        if let Some(format) = &facets.format {
            pipeline.push(Box::new(FormatFilter::new(format.as_str())));
        }
        if let Some(genre) = &facets.genre {
            pipeline.push(Box::new(GenreFilter::new(genre.as_str())));
        }
        if let Some(country) = &facets.country {
            pipeline.push(Box::new(CountryFilter::new(country.as_str())));
        }
        if let Some(picture) = &facets.picture {
            pipeline.push(Box::new(PictureFilter::new(picture.as_str())));
        }

        Ok(pipeline)
    }

    /// Run the query against a catalog.
    ///
    /// A search pattern that cannot be compiled matches nothing.
    #[instrument(skip_all, fields(entries = catalog.len()))]
    pub fn run<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Entry> {
        self.run_on(catalog.entries())
    }

    /// Run the query against any slice of entries
    pub fn run_on<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let pipeline = match self.pipeline() {
            Ok(pipeline) => pipeline,
            Err(err) => {
                warn!("Search matches nothing: {}", err);
                return Vec::new();
            }
        };

        let mut results = pipeline.apply(entries);
        if let Some(Sort { key, desc }) = self.sort {
            results.sort_by(|a, b| key.compare(a, b, desc));
        }

        debug!("Query returned {} of {} entries", results.len(), entries.len());
        results
    }
}
