//! Pairwise comparators used to sort query results.
//!
//! Every comparator takes a `desc` flag and keeps entries without a value
//! after entries with one, whichever direction is requested. Equal values
//! compare `Equal` before any of the "no value" rules apply.

use crate::entry::Entry;
use crate::matching::strip_diacritics;
use std::cmp::Ordering;

/// Certificates in rank order
pub const CERTIFICATES: [&str; 7] = ["U", "PG", "12", "12A", "15", "18", "Exempt"];

const EXEMPT: usize = CERTIFICATES.len() - 1;

/// Position of a certificate in `CERTIFICATES`
pub fn certificate_rank(certificate: Option<&str>) -> Option<usize> {
    let certificate = certificate?;
    CERTIFICATES.iter().position(|&c| c == certificate)
}

/// Compare the best value of two lists: the minimum ascending, the maximum
/// descending. Empty lists sort last in both directions.
fn compare_numbers(a: &[u32], b: &[u32], desc: bool) -> Ordering {
    let pick = |list: &[u32]| {
        if desc {
            list.iter().max().copied()
        } else {
            list.iter().min().copied()
        }
    };

    match (pick(a), pick(b)) {
        (a, b) if a == b => Ordering::Equal,
        (None, _) => Ordering::Greater,
        (_, None) => Ordering::Less,
        (Some(a), Some(b)) if desc => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Case- and accent-insensitive ordering, with the raw text as tie-break
fn collate(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| strip_diacritics(s).to_lowercase();
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

impl Entry {
    /// Order by sort title
    pub fn compare_title(&self, other: &Entry, desc: bool) -> Ordering {
        let ordering = collate(self.sort_title(), other.sort_title());
        if desc { ordering.reverse() } else { ordering }
    }

    /// Order by certificate rank.
    ///
    /// `Exempt` follows every rated certificate in both directions, and
    /// unknown certificates follow `Exempt`.
    pub fn compare_certificate(&self, other: &Entry, desc: bool) -> Ordering {
        match (certificate_rank(self.certificate()), certificate_rank(other.certificate())) {
            (a, b) if a == b => Ordering::Equal,
            (None, _) => Ordering::Greater,
            (_, None) => Ordering::Less,
            (Some(EXEMPT), _) => Ordering::Greater,
            (_, Some(EXEMPT)) => Ordering::Less,
            (Some(a), Some(b)) if desc => b.cmp(&a),
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }

    pub fn compare_duration(&self, other: &Entry, desc: bool) -> Ordering {
        compare_numbers(&self.durations().list, &other.durations().list, desc)
    }

    pub fn compare_year(&self, other: &Entry, desc: bool) -> Ordering {
        compare_numbers(&self.years().list, &other.years().list, desc)
    }
}
