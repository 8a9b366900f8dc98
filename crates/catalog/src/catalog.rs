//! The `Catalog` aggregate: every entry of a snapshot plus the
//! catalog-level facets the filter UI offers.

use crate::entry::Entry;
use data_loader::{CatalogSource, Column, ConflictWarning, OrderedSet};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

/// Distinct facet values across the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFacets {
    /// Film formats, in order of first appearance
    pub formats: Vec<String>,
    /// Genres, in order of first appearance, empty values excluded
    pub genres: Vec<String>,
    /// Countries after list splitting, sorted
    pub countries: Vec<String>,
    /// Picture types after list splitting, in order of first appearance
    pub pictures: Vec<String>,
}

impl CatalogFacets {
    fn collect(entries: &[Entry]) -> Self {
        let formats: OrderedSet<String> =
            entries.iter().flat_map(|e| e.format()).cloned().collect();
        let genres: OrderedSet<String> = entries
            .iter()
            .flat_map(|e| e.genre())
            .filter(|g| !g.is_empty())
            .cloned()
            .collect();
        let countries: OrderedSet<String> = entries
            .iter()
            .flat_map(|e| &e.countries().list)
            .cloned()
            .collect();
        let pictures: OrderedSet<String> = entries
            .iter()
            .flat_map(|e| &e.pictures().list)
            .cloned()
            .collect();

        let mut countries = countries.into_vec();
        countries.sort();

        Self {
            formats: formats.into_vec(),
            genres: genres.into_vec(),
            countries,
            pictures: pictures.into_vec(),
        }
    }
}

/// A loaded catalog snapshot.
///
/// Entries keep canonical record order and are never mutated, so a catalog
/// can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Catalog {
    date: Option<String>,
    columns: Vec<Column>,
    entries: Vec<Entry>,
    warnings: Vec<ConflictWarning>,
    facets: CatalogFacets,
}

impl Catalog {
    /// Derive entries for every record of a source.
    ///
    /// Derivation runs in parallel; `collect` on an indexed parallel
    /// iterator keeps record order.
    #[instrument(skip(source), fields(records = source.records.len()))]
    pub fn new(source: CatalogSource) -> Self {
        let entries: Vec<Entry> = source.records.par_iter().map(Entry::new).collect();
        let facets = CatalogFacets::collect(&entries);

        let flagged = entries.iter().filter(|e| !e.warnings().is_empty()).count();
        info!(
            "Derived {} entries ({} with warnings, {} merge conflicts)",
            entries.len(),
            flagged,
            source.warnings.len()
        );

        Self {
            date: source.date,
            columns: source.columns,
            entries,
            warnings: source.warnings,
            facets,
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Conflict warnings from the row merge
    pub fn warnings(&self) -> &[ConflictWarning] {
        &self.warnings
    }

    pub fn facets(&self) -> &CatalogFacets {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<CatalogSource> for Catalog {
    fn from(source: CatalogSource) -> Self {
        Self::new(source)
    }
}
