//! Facet derivation: turn loosely formatted cells into typed lists.
//!
//! Every function here is pure and total. Malformed input degrades to an
//! empty list, and the entry records a warning where the input looks
//! ambiguous (see `Entry::new`).

use data_loader::Cell;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static PEOPLE_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[,&;]|\band\b").unwrap());
static SURNAME_GIVEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z]+),\s+([a-z]+)$").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+\b").unwrap());
static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-z]+").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// A parsed list together with the text it was parsed from.
///
/// `source` is the display form of the raw cell (empty when the cell was
/// absent); `list` is the structured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derived<T> {
    pub source: String,
    pub list: Vec<T>,
}

impl<T> Derived<T> {
    pub fn new(source: impl Into<String>, list: Vec<T>) -> Self {
        Self {
            source: source.into(),
            list,
        }
    }

    pub fn empty() -> Self {
        Self {
            source: String::new(),
            list: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Display text of a cell, or `None` for an absent or blank cell
fn non_blank(cell: Option<&Cell>) -> Option<String> {
    cell.filter(|c| !c.is_blank()).map(|c| c.to_string())
}

fn trimmed_parts<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Countries split on hyphen, comma or slash.
///
/// Only text cells are split; a numeric country yields an empty list.
pub fn country_list(cell: Option<&Cell>) -> Derived<String> {
    let Some(cell) = cell else {
        return Derived::empty();
    };
    match cell.as_text() {
        Some(text) => Derived::new(text, trimmed_parts(text.split(['-', ',', '/']))),
        None => Derived::new(cell.to_string(), Vec::new()),
    }
}

/// Picture types, lower-cased and split on commas
pub fn picture_list(cell: Option<&Cell>) -> Derived<String> {
    match non_blank(cell) {
        Some(text) => {
            let list = trimmed_parts(text.to_lowercase().split(','));
            Derived::new(text, list)
        }
        None => Derived::empty(),
    }
}

/// Names split on comma, ampersand, semicolon or the word "and"
pub fn split_people(cell: Option<&Cell>) -> Derived<String> {
    match non_blank(cell) {
        Some(text) => {
            let list = trimmed_parts(PEOPLE_DELIMITERS.split(&text));
            Derived::new(text, list)
        }
        None => Derived::empty(),
    }
}

/// Directors, with a lone "Surname, Given" reordered to "Given Surname".
///
/// Example: "Smith, John" -> ["John Smith"]
///          "Smith, John & Doe, Jane" -> ["Smith", "John", "Doe", "Jane"]
pub fn match_directors(cell: Option<&Cell>) -> Derived<String> {
    let Some(text) = non_blank(cell) else {
        return Derived::empty();
    };

    let list = match SURNAME_GIVEN.captures(&text) {
        Some(caps) => vec![format!("{} {}", &caps[2], &caps[1])],
        None => trimmed_parts(PEOPLE_DELIMITERS.split(&text)),
    };
    Derived::new(text, list)
}

fn number_value(n: f64) -> Option<u32> {
    (n.is_finite() && n >= 0.0 && n <= u32::MAX as f64).then(|| n.round() as u32)
}

/// Every integer in the cell, in minutes.
///
/// Example: "90 mins" -> [90]
///          "95 and 102 min" -> [95, 102]
pub fn match_durations(cell: Option<&Cell>) -> Derived<u32> {
    match cell.filter(|c| !c.is_blank()) {
        Some(Cell::Number(n)) => {
            Derived::new(Cell::Number(*n).to_string(), number_value(*n).into_iter().collect())
        }
        Some(Cell::Text(text)) => {
            let list = DIGIT_RUN
                .find_iter(text)
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            Derived::new(text.as_str(), list)
        }
        None => Derived::empty(),
    }
}

/// Years, completing abbreviated ranges against the previous year.
///
/// Each digit run after the first that is shorter than four digits replaces
/// the trailing digits of the previous resolved year.
///
/// Example: "1998-9" -> [1998, 1999]
///          "1998/99, 2003" -> [1998, 1999, 2003]
pub fn match_years(cell: Option<&Cell>) -> Derived<u32> {
    match cell.filter(|c| !c.is_blank()) {
        Some(Cell::Number(n)) => {
            Derived::new(Cell::Number(*n).to_string(), number_value(*n).into_iter().collect())
        }
        Some(Cell::Text(text)) => Derived::new(text.as_str(), resolve_years(text)),
        None => Derived::empty(),
    }
}

fn resolve_years(text: &str) -> Vec<u32> {
    let mut years = Vec::new();
    let mut previous = String::new();

    for run in DIGIT_RUN.find_iter(text).map(|m| m.as_str()) {
        if previous.is_empty() || run.len() >= 4 {
            previous = run.to_string();
        } else {
            // Digit runs are ASCII, so byte offsets are char offsets
            let keep = previous.len().saturating_sub(run.len());
            previous = format!("{}{}", &previous[..keep], run);
        }
        // Runs too long for a year are skipped but still anchor the next one
        if let Ok(year) = previous.parse() {
            years.push(year);
        }
    }
    years
}

/// True when duration text has residue beyond numbers, separators and
/// words starting with "min" or "and".
///
/// Example: "90 mins" -> false
///          "approx. 90" -> true
pub fn duration_is_ambiguous(text: &str) -> bool {
    let allowed = |c: char| matches!(c, '-' | ' ' | ',' | '/' | 'a'..='z' | '0'..='9');
    if !text.chars().all(allowed) {
        return true;
    }
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| word.starts_with(|c: char| c.is_ascii_lowercase()))
        .any(|word| !(word.starts_with("min") || word.starts_with("and")))
}

pub fn has_four_digit_year(text: &str) -> bool {
    FOUR_DIGITS.is_match(text)
}

pub fn looks_like_html(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

/// Synopsis paragraphs.
///
/// `short` is split on runs of newlines and `long` on single newlines.
/// `lines` is the long text alone when it already contains the short text,
/// otherwise short followed by long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Synopsis {
    pub short: Vec<String>,
    pub long: Vec<String>,
    pub lines: Vec<String>,
}

impl Synopsis {
    pub fn new(short: Option<&str>, long: Option<&str>) -> Self {
        let short_lines: Vec<String> = short
            .map(|s| PARAGRAPH_BREAK.split(s).map(str::to_string).collect())
            .unwrap_or_default();
        let long_text = long.unwrap_or_default();
        let long_lines: Vec<String> = if long_text.is_empty() {
            Vec::new()
        } else {
            long_text.split('\n').map(str::to_string).collect()
        };

        let lines = match short {
            Some(s) if long_text.contains(s) => long_lines.clone(),
            _ => short_lines.iter().chain(&long_lines).cloned().collect(),
        };

        Self {
            short: short_lines,
            long: long_lines,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    #[test]
    fn test_years() {
        assert_eq!(match_years(Some(&text("1998-9"))).list, vec![1998, 1999]);
        assert_eq!(match_years(Some(&text("1998/99"))).list, vec![1998, 1999]);
        assert_eq!(match_years(Some(&text("2001"))).list, vec![2001]);
        assert_eq!(match_years(Some(&text("1959-60, 1962"))).list, vec![1959, 1960, 1962]);
        assert_eq!(match_years(Some(&Cell::Number(1945.0))).list, vec![1945]);
        assert!(match_years(None).list.is_empty());
        assert!(match_years(Some(&text("unknown"))).list.is_empty());
    }

    #[test]
    fn test_years_skip_oversized_digit_runs() {
        assert_eq!(match_years(Some(&text("12345678901, 1999"))).list, vec![1999]);
        assert!(match_years(Some(&text("98765432109"))).is_empty());
    }

    #[test]
    fn test_years_keep_source_text() {
        let years = match_years(Some(&text("1998-9")));
        assert_eq!(years.source, "1998-9");
        assert_eq!(match_years(Some(&Cell::Number(1945.0))).source, "1945");
    }

    #[test]
    fn test_directors() {
        assert_eq!(match_directors(Some(&text("Smith, John"))).list, vec!["John Smith"]);

        let pair = match_directors(Some(&text("Smith, John & Doe, Jane")));
        assert_eq!(pair.list, vec!["Smith", "John", "Doe", "Jane"]);
        assert_eq!(pair.source, "Smith, John & Doe, Jane");

        let duo = match_directors(Some(&text("Michael Powell and Emeric Pressburger")));
        assert_eq!(duo.list, vec!["Michael Powell", "Emeric Pressburger"]);

        assert!(match_directors(None).list.is_empty());
    }

    #[test]
    fn test_people_skip_empty_names() {
        let cast = split_people(Some(&text("Celia Johnson; ; Trevor Howard AND Stanley Holloway")));
        assert_eq!(cast.list, vec!["Celia Johnson", "Trevor Howard", "Stanley Holloway"]);
        // "and" inside a name is not a delimiter
        let cast = split_people(Some(&text("Sandra Anderson")));
        assert_eq!(cast.list, vec!["Sandra Anderson"]);
    }

    #[test]
    fn test_durations() {
        assert_eq!(match_durations(Some(&text("90 mins"))).list, vec![90]);
        assert_eq!(match_durations(Some(&text("95 and 102 min"))).list, vec![95, 102]);
        assert_eq!(match_durations(Some(&Cell::Number(86.0))).list, vec![86]);
        assert!(match_durations(Some(&text(""))).list.is_empty());
        assert!(match_durations(None).list.is_empty());
    }

    #[test]
    fn test_countries() {
        let countries = country_list(Some(&text("UK - France/Germany, Italy")));
        assert_eq!(countries.list, vec!["UK", "France", "Germany", "Italy"]);
        let numeric = country_list(Some(&Cell::Number(826.0)));
        assert!(numeric.is_empty());
        assert_eq!(numeric.source, "826");
        assert!(country_list(None).list.is_empty());
    }

    #[test]
    fn test_pictures() {
        let pictures = picture_list(Some(&text("Colour, B&W")));
        assert_eq!(pictures.list, vec!["colour", "b&w"]);
        assert!(picture_list(None).list.is_empty());
    }

    #[test]
    fn test_duration_ambiguity() {
        assert!(!duration_is_ambiguous("90 mins"));
        assert!(!duration_is_ambiguous("90-95 minutes"));
        assert!(!duration_is_ambiguous("95 and 102 min"));
        assert!(duration_is_ambiguous("1 hour"));
        assert!(duration_is_ambiguous("approx. 90"));
        assert!(duration_is_ambiguous("90 Mins"));
    }

    #[test]
    fn test_year_and_html_checks() {
        assert!(has_four_digit_year("c. 1920"));
        assert!(!has_four_digit_year("'92"));
        assert!(looks_like_html("A <i>classic</i>"));
        assert!(!looks_like_html("3 < 4"));
    }

    #[test]
    fn test_synopsis_prefers_long_when_it_contains_short() {
        let synopsis = Synopsis::new(
            Some("A chance meeting."),
            Some("A chance meeting.\nA railway romance."),
        );
        assert_eq!(synopsis.lines, vec!["A chance meeting.", "A railway romance."]);
        assert_eq!(synopsis.short, vec!["A chance meeting."]);
        assert_eq!(synopsis.long.len(), 2);
    }

    #[test]
    fn test_synopsis_concatenates_otherwise() {
        let synopsis = Synopsis::new(Some("Short one.\n\nShort two."), Some("Long text."));
        assert_eq!(synopsis.lines, vec!["Short one.", "Short two.", "Long text."]);

        let synopsis = Synopsis::new(None, Some("Only long."));
        assert_eq!(synopsis.lines, vec!["Only long."]);

        assert!(Synopsis::new(None, None).lines.is_empty());
    }
}
