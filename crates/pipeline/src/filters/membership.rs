//! Filters on the set-valued columns merged from duplicate rows.

use crate::traits::Filter;
use catalog::Entry;

/// Keeps entries listing the requested genre.
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        entry.has_genre(&self.genre)
    }
}

/// Keeps entries available in the requested film format.
pub struct FormatFilter {
    format: String,
}

impl FormatFilter {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Filter for FormatFilter {
    fn name(&self) -> &str {
        "FormatFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        entry.has_format(&self.format)
    }
}
