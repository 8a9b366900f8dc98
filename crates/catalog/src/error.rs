//! Error types for the catalog crate.

use thiserror::Error;

/// Errors raised while building search matchers
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A user-supplied pattern could not be compiled
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
