//! The `Entry` type: one canonical record plus its derived facets.
//!
//! Facets are computed once in `Entry::new` and stored read-only; an entry
//! is never mutated after construction.

use crate::derive::{self, Derived, Synopsis};
use crate::matching::{highlight_line, Matcher, Segment};
use data_loader::{CanonicalRecord, Cell};
use serde::Serialize;

/// A catalog title ready for searching, filtering and sorting.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    title: String,
    sort_title: String,
    original_title: Option<String>,
    certificate: Option<String>,
    cast: Derived<String>,
    directors: Derived<String>,
    countries: Derived<String>,
    pictures: Derived<String>,
    durations: Derived<u32>,
    years: Derived<u32>,
    genre: Vec<String>,
    format: Vec<String>,
    synopsis: Synopsis,
    warnings: Vec<String>,
}

fn text_of(cell: Option<&Cell>) -> Option<String> {
    cell.map(|c| c.to_string())
}

impl Entry {
    /// Derive an entry from a canonical record.
    ///
    /// Ambiguous input never fails; it is recorded in `warnings`.
    pub fn new(record: &CanonicalRecord) -> Self {
        let fields = &record.fields;
        let mut warnings = Vec::new();

        if fields.cast.as_ref().is_some_and(Cell::is_number) {
            warnings.push("Cast is a number".to_string());
        }
        if fields.country.as_ref().is_some_and(Cell::is_number) {
            warnings.push("Country is a number".to_string());
        }
        if let Some(Cell::Text(duration)) = &fields.duration {
            if derive::duration_is_ambiguous(duration) {
                warnings.push("Duration contains ambiguous data".to_string());
            }
        }
        if let Some(Cell::Text(year)) = &fields.year {
            if !derive::has_four_digit_year(year) {
                warnings.push("Year does not contain a 4-digit year".to_string());
            }
        }

        let short = text_of(fields.short_synopsis.as_ref());
        let long = text_of(fields.long_synopsis.as_ref());
        if short.iter().chain(long.iter()).any(|s| derive::looks_like_html(s)) {
            warnings.push("Synopsis contains HTML tags".to_string());
        }

        Self {
            title: text_of(fields.title.as_ref()).unwrap_or_default(),
            sort_title: text_of(fields.alphabetical_title.as_ref()).unwrap_or_default(),
            original_title: text_of(fields.original_title.as_ref()),
            certificate: fields
                .certificate
                .as_ref()
                .filter(|c| !c.is_blank())
                .map(|c| c.to_string()),
            cast: derive::split_people(fields.cast.as_ref()),
            directors: derive::match_directors(fields.director.as_ref()),
            countries: derive::country_list(fields.country.as_ref()),
            pictures: derive::picture_list(fields.picture.as_ref()),
            durations: derive::match_durations(fields.duration.as_ref()),
            years: derive::match_years(fields.year.as_ref()),
            genre: record.genre.iter().filter(|g| !g.is_empty()).cloned().collect(),
            format: record.film_format.iter().cloned().collect(),
            synopsis: Synopsis::new(short.as_deref(), long.as_deref()),
            warnings,
        }
    }

    // Accessors

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sort_title(&self) -> &str {
        &self.sort_title
    }

    pub fn original_title(&self) -> Option<&str> {
        self.original_title.as_deref()
    }

    pub fn certificate(&self) -> Option<&str> {
        self.certificate.as_deref()
    }

    pub fn cast(&self) -> &Derived<String> {
        &self.cast
    }

    pub fn directors(&self) -> &Derived<String> {
        &self.directors
    }

    pub fn countries(&self) -> &Derived<String> {
        &self.countries
    }

    pub fn pictures(&self) -> &Derived<String> {
        &self.pictures
    }

    pub fn durations(&self) -> &Derived<u32> {
        &self.durations
    }

    pub fn years(&self) -> &Derived<u32> {
        &self.years
    }

    pub fn genre(&self) -> &[String] {
        &self.genre
    }

    pub fn format(&self) -> &[String] {
        &self.format
    }

    pub fn synopsis(&self) -> &Synopsis {
        &self.synopsis
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // Facet membership

    pub fn has_country(&self, country: &str) -> bool {
        self.countries.list.iter().any(|c| c == country)
    }

    pub fn has_picture_type(&self, picture: &str) -> bool {
        self.pictures.list.iter().any(|p| p == picture)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.format.iter().any(|f| f == format)
    }

    // Search

    /// Display title, sort title or original title
    pub fn matches_title(&self, matcher: &Matcher) -> bool {
        matcher.is_match(&self.title)
            || matcher.is_match(&self.sort_title)
            || self.original_title.as_deref().is_some_and(|t| matcher.is_match(t))
    }

    /// Raw cast and director text, or any single derived name
    pub fn matches_person(&self, matcher: &Matcher) -> bool {
        matcher.is_match(&self.cast.source)
            || matcher.is_match(&self.directors.source)
            || self
                .cast
                .list
                .iter()
                .chain(&self.directors.list)
                .any(|name| matcher.is_match(name))
    }

    pub fn matches_synopsis(&self, matcher: &Matcher) -> bool {
        self.synopsis.lines.iter().any(|line| matcher.is_match(line))
    }

    /// Synopsis lines split into plain and marked segments.
    ///
    /// Without a matcher every line comes back as a single plain segment.
    pub fn highlight<T>(
        &self,
        matcher: Option<&Matcher>,
        mut mark: impl FnMut(&str) -> T,
    ) -> Vec<Vec<Segment<T>>> {
        self.synopsis
            .lines
            .iter()
            .map(|line| match matcher {
                Some(matcher) => highlight_line(matcher, line, &mut mark),
                None => vec![Segment::Plain(line.clone())],
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use data_loader::{OrderedSet, RecordFields};

    pub(crate) fn record(title: &str) -> CanonicalRecord {
        CanonicalRecord {
            fields: RecordFields {
                title: Some(title.into()),
                alphabetical_title: Some(title.into()),
                ..Default::default()
            },
            genre: OrderedSet::new(),
            film_format: OrderedSet::new(),
        }
    }

    #[test]
    fn test_derives_facets() {
        let mut rec = record("Brief Encounter");
        rec.fields.director = Some("Lean, David".into());
        rec.fields.cast = Some("Celia Johnson, Trevor Howard".into());
        rec.fields.country = Some("UK".into());
        rec.fields.duration = Some(Cell::Number(86.0));
        rec.fields.year = Some("1945".into());
        rec.fields.certificate = Some(Cell::Number(12.0));
        rec.fields.picture = Some("B&W".into());
        rec.genre.insert("Romance".to_string());
        rec.film_format.insert("DCP".to_string());

        let entry = Entry::new(&rec);
        assert_eq!(entry.directors().list, vec!["David Lean"]);
        assert_eq!(entry.directors().source, "Lean, David");
        assert_eq!(entry.cast().list, vec!["Celia Johnson", "Trevor Howard"]);
        assert_eq!(entry.durations().list, vec![86]);
        assert_eq!(entry.years().list, vec![1945]);
        assert_eq!(entry.certificate(), Some("12"));
        assert!(entry.has_country("UK"));
        assert!(entry.has_picture_type("b&w"));
        assert!(entry.has_genre("Romance"));
        assert!(entry.has_format("DCP"));
        assert!(entry.warnings().is_empty());
    }

    #[test]
    fn test_empty_record_has_empty_facets() {
        let entry = Entry::new(&record("Untitled"));
        assert!(entry.years().list.is_empty());
        assert!(entry.durations().list.is_empty());
        assert!(entry.countries().list.is_empty());
        assert!(entry.pictures().list.is_empty());
        assert!(entry.cast().list.is_empty());
        assert!(entry.directors().list.is_empty());
        assert_eq!(entry.certificate(), None);
        assert!(entry.synopsis().lines.is_empty());
        assert!(entry.warnings().is_empty());
    }

    #[test]
    fn test_warnings() {
        let mut rec = record("Oddities");
        rec.fields.cast = Some(Cell::Number(3.0));
        rec.fields.country = Some(Cell::Number(826.0));
        rec.fields.duration = Some("about 90".into());
        rec.fields.year = Some("'60s".into());
        rec.fields.long_synopsis = Some("<p>Restored</p>".into());

        let entry = Entry::new(&rec);
        assert_eq!(
            entry.warnings(),
            &[
                "Cast is a number",
                "Country is a number",
                "Duration contains ambiguous data",
                "Year does not contain a 4-digit year",
                "Synopsis contains HTML tags",
            ]
        );
        assert!(entry.countries().list.is_empty());
        assert_eq!(entry.cast().list, vec!["3"]);
    }

    #[test]
    fn test_matches_title() {
        let mut rec = record("Les Enfants du Paradis");
        rec.fields.alphabetical_title = Some("Enfants du Paradis, Les".into());
        rec.fields.original_title = Some("Children of Paradise".into());
        let entry = Entry::new(&rec);

        assert!(entry.matches_title(&Matcher::literal("enfants").unwrap()));
        assert!(entry.matches_title(&Matcher::literal("children").unwrap()));
        assert!(!entry.matches_title(&Matcher::literal("heaven").unwrap()));
    }

    #[test]
    fn test_matches_title_diacritics() {
        let accented = Entry::new(&record("café"));
        let plain = Entry::new(&record("cafe"));

        assert!(accented.matches_title(&Matcher::literal("cafe").unwrap()));
        assert!(!plain.matches_title(&Matcher::literal("café").unwrap()));
    }

    #[test]
    fn test_matches_person() {
        let mut rec = record("A Matter of Life and Death");
        rec.fields.director = Some("Michael Powell & Emeric Pressburger".into());
        rec.fields.cast = Some("David Niven; Kim Hunter".into());
        let entry = Entry::new(&rec);

        assert!(entry.matches_person(&Matcher::literal("pressburger").unwrap()));
        assert!(entry.matches_person(&Matcher::literal("kim hunter").unwrap()));
        assert!(!entry.matches_person(&Matcher::literal("olivier").unwrap()));
    }

    #[test]
    fn test_highlight() {
        let mut rec = record("Kes");
        rec.fields.long_synopsis = Some("A boy trains a kestrel.\nHe lives in Barnsley.".into());
        let entry = Entry::new(&rec);

        let unchanged = entry.highlight(None, |s| s.to_string());
        assert_eq!(unchanged.len(), 2);
        assert_eq!(unchanged[0], vec![Segment::Plain("A boy trains a kestrel.".to_string())]);

        let matcher = Matcher::literal("kestrel").unwrap();
        assert!(entry.matches_synopsis(&matcher));
        let marked = entry.highlight(Some(&matcher), |s| format!("[{}]", s));
        assert_eq!(marked[0].len(), 3);
        assert_eq!(marked[0][1], Segment::Marked("[kestrel]".to_string()));
        assert_eq!(marked[1], vec![Segment::Plain("He lives in Barnsley.".to_string())]);
    }
}
