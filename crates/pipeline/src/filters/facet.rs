//! Filters on facets derived from free-text columns.
//!
//! These test the entry's split lists, so "France" matches a country cell
//! of "UK - France" and "b&w" matches a picture cell of "Colour, B&W".

use crate::traits::Filter;
use catalog::Entry;

/// Keeps entries whose derived country list contains the country.
pub struct CountryFilter {
    country: String,
}

impl CountryFilter {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }
}

impl Filter for CountryFilter {
    fn name(&self) -> &str {
        "CountryFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        entry.has_country(&self.country)
    }
}

/// Keeps entries whose derived picture list contains the picture type.
pub struct PictureFilter {
    picture: String,
}

impl PictureFilter {
    pub fn new(picture: impl Into<String>) -> Self {
        Self {
            picture: picture.into(),
        }
    }
}

impl Filter for PictureFilter {
    fn name(&self) -> &str {
        "PictureFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        entry.has_picture_type(&self.picture)
    }
}
