//! Filter implementations for the query pipeline.
//!
//! This module contains all the concrete filters that can be composed
//! into a FilterPipeline.

pub mod search;
pub mod certificate;
pub mod membership;
pub mod facet;

// Re-export for convenience
pub use certificate::CertificateFilter;
pub use facet::{CountryFilter, PictureFilter};
pub use membership::{FormatFilter, GenreFilter};
pub use search::{SearchField, SearchFilter};
