//! Filter to keep entries with one exact certificate.

use crate::traits::Filter;
use catalog::Entry;

/// Keeps entries whose certificate equals the requested one.
pub struct CertificateFilter {
    certificate: String,
}

impl CertificateFilter {
    pub fn new(certificate: impl Into<String>) -> Self {
        Self {
            certificate: certificate.into(),
        }
    }
}

impl Filter for CertificateFilter {
    fn name(&self) -> &str {
        "CertificateFilter"
    }

    fn keep(&self, entry: &Entry) -> bool {
        entry.certificate() == Some(self.certificate.as_str())
    }
}
