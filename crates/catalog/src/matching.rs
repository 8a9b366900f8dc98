//! Diacritic-tolerant, case-insensitive search matching.
//!
//! A `Matcher` is built once per search term and reused across every entry.
//! When the term itself carries no accents, target text is decomposed (NFD)
//! and its combining marks are dropped before matching, so "cafe" finds
//! "café". A term that does carry accents must match them exactly.

use crate::error::Result;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove combining marks after canonical decomposition
pub fn strip_diacritics(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.nfd().filter(|c| !is_combining_mark(*c)).collect())
}

/// True if the text decomposes to anything carrying a combining mark
pub fn has_diacritics(text: &str) -> bool {
    !text.is_ascii() && text.nfd().any(is_combining_mark)
}

/// A compiled search term.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    fold_diacritics: bool,
}

impl Matcher {
    /// Match free text literally; regex metacharacters are escaped
    pub fn literal(term: &str) -> Result<Self> {
        Self::build(&regex::escape(term), has_diacritics(term))
    }

    /// Match a caller-supplied regular expression.
    ///
    /// Patterns that can match empty text (such as `x*`) follow the `regex`
    /// crate's iteration rules: an empty match directly after a non-empty
    /// one is not reported, so highlights never contain an empty mark there.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Self::build(pattern, has_diacritics(pattern))
    }

    fn build(pattern: &str, accented: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            regex,
            fold_diacritics: !accented,
        })
    }

    pub fn is_match(&self, target: &str) -> bool {
        if self.fold_diacritics {
            self.regex.is_match(&strip_diacritics(target))
        } else {
            self.regex.is_match(target)
        }
    }

    /// Byte ranges of every non-overlapping match in `line`, left to right.
    ///
    /// When diacritics are folded, each match found in the stripped text is
    /// widened to whole characters of the original line.
    pub fn find_ranges(&self, line: &str) -> Vec<Range<usize>> {
        if !self.fold_diacritics || line.is_ascii() {
            return self.regex.find_iter(line).map(|m| m.range()).collect();
        }

        // For each byte of the stripped text, the original char it came from
        let mut stripped = String::with_capacity(line.len());
        let mut origin: Vec<Range<usize>> = Vec::with_capacity(line.len() + 1);
        for (start, c) in line.char_indices() {
            let end = start + c.len_utf8();
            for base in c.nfd().filter(|d| !is_combining_mark(*d)) {
                stripped.push(base);
                origin.extend(std::iter::repeat_n(start..end, base.len_utf8()));
            }
        }
        origin.push(line.len()..line.len());

        let mut ranges = Vec::new();
        let mut last_end = 0;
        for m in self.regex.find_iter(&stripped) {
            let start = origin[m.start()].start;
            let end = if m.is_empty() {
                start
            } else {
                origin[m.end() - 1].end
            };
            if start < last_end {
                continue;
            }
            ranges.push(start..end);
            last_end = end;
        }
        ranges
    }
}

/// One piece of a highlighted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<T> {
    Plain(String),
    Marked(T),
}

/// Split a line into alternating plain and marked segments.
///
/// The result always starts and ends with a plain segment (possibly empty),
/// and the segments cover the whole line without overlap.
pub fn highlight_line<T>(
    matcher: &Matcher,
    line: &str,
    mark: &mut impl FnMut(&str) -> T,
) -> Vec<Segment<T>> {
    let mut segments = Vec::new();
    let mut ix = 0;
    for range in matcher.find_ranges(line) {
        segments.push(Segment::Plain(line[ix..range.start].to_string()));
        segments.push(Segment::Marked(mark(&line[range.clone()])));
        ix = range.end;
    }
    segments.push(Segment::Plain(line[ix..].to_string()));
    segments
}
