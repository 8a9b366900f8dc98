//! Filter to keep entries matching a search term.
//!
//! The term is compiled once into a `Matcher`; the requested field decides
//! which parts of an entry are searched.

use crate::traits::Filter;
use catalog::{Entry, Matcher};
use serde::{Deserialize, Serialize};

/// Which parts of an entry a search looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Display, sort and original titles
    Title,
    /// Cast and directors
    People,
    /// Titles or synopsis
    #[default]
    Any,
}

/// Keeps entries whose selected field matches the term.
pub struct SearchFilter {
    matcher: Matcher,
    field: SearchField,
}

impl SearchFilter {
    pub fn new(matcher: Matcher, field: SearchField) -> Self {
        Self { matcher, field }
    }
}

impl Filter for SearchFilter {
    fn name(&self) -> &str {
        "SearchFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        match self.field {
            SearchField::Title => entry.matches_title(&self.matcher),
            SearchField::People => entry.matches_person(&self.matcher),
            SearchField::Any => {
                entry.matches_title(&self.matcher) || entry.matches_synopsis(&self.matcher)
            }
        }
    }
}
