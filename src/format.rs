//! Display formatting for author lists and dates.
//!
//! Everything here is a pure string transform. Bad input never fails: an
//! unparseable date renders as [`INVALID_DATE`], and schema problems such as
//! a missing author name are caught earlier by [`crate::schema`].
//!
//! ## Author markers
//!
//! | Flag | Plain | HTML |
//! |------|-------|------|
//! | `equal` | `†` | `<sup>†</sup>` |
//! | `corr` | `*` | `<sup>*</sup>` |
//!
//! When both flags are set the equal-contribution marker comes first.

use crate::schema::Author;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use maud::html;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// The site owner's name, highlighted in author strings.
pub const DEFAULT_EMPHASIZED_AUTHOR: &str = "Griffin Chure";

/// Placeholder rendered for dates that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const EQUAL_MARKER: char = '†';
const CORR_MARKER: char = '*';

/// Join author names with `", "`, suffixing `†` for equal contribution and
/// `*` for the corresponding author.
pub fn format_authors(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| {
            let mut name = a.name.clone();
            if a.equal {
                name.push(EQUAL_MARKER);
            }
            if a.corr {
                name.push(CORR_MARKER);
            }
            name
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Same as [`format_authors`], with markers as `<sup>` elements.
///
/// Names are HTML-escaped.
pub fn format_authors_html(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| {
            html! {
                (a.name)
                @if a.equal { sup { "†" } }
                @if a.corr { sup { "*" } }
            }
            .into_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn emphasis_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&marker_pattern(DEFAULT_EMPHASIZED_AUTHOR)).expect("constant pattern")
    })
}

fn marker_pattern(name: &str) -> String {
    format!("{}[{EQUAL_MARKER}{CORR_MARKER}]*", regex::escape(name))
}

fn wrap_matches<'t>(re: &Regex, text: &'t str) -> Cow<'t, str> {
    re.replace_all(text, r#"<strong class="emphasized-author">${0}</strong>"#)
}

/// Wrap every occurrence of the site owner's name, plus any trailing `†`/`*`
/// markers, in `<strong class="emphasized-author">`.
///
/// Apply once. Matching is by substring, so running it again over its own
/// output nests a second `<strong>` inside the first.
pub fn emphasize_author(text: &str) -> String {
    wrap_matches(emphasis_regex(), text).into_owned()
}

/// [`emphasize_author`] for an arbitrary name. An empty name is a no-op.
pub fn emphasize_name(text: &str, name: &str) -> String {
    if name.is_empty() {
        return text.to_string();
    }
    if name == DEFAULT_EMPHASIZED_AUTHOR {
        return emphasize_author(text);
    }
    match Regex::new(&marker_pattern(name)) {
        Ok(re) => wrap_matches(&re, text).into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Parse a front matter date string into a calendar date.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM/DD`, naive
/// `YYYY-MM-DDTHH:MM[:SS]`, RFC 3339 timestamps, and `January 5, 2024` /
/// `Jan 5, 2024`. Timestamps with an offset are converted to UTC before the
/// date is taken, so an evening timestamp west of Greenwich lands on the next
/// day.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if let Some(date) = parse_partial_iso(s) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `YYYY` and `YYYY-MM`, which chrono's format parser cannot express.
fn parse_partial_iso(s: &str) -> Option<NaiveDate> {
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    let mut parts = s.split('-');
    let year = parts.next().filter(|p| p.len() == 4 && all_digits(p))?;
    let month = parts.next();
    if parts.next().is_some() {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    match month {
        None => NaiveDate::from_ymd_opt(year, 1, 1),
        Some(m) if m.len() == 2 && all_digits(m) => {
            NaiveDate::from_ymd_opt(year, m.parse().ok()?, 1)
        }
        Some(_) => None,
    }
}

/// Render a date string as `Mon D, YYYY` (`"Jan 5, 2024"`), in English and UTC.
///
/// Unparseable input renders as [`INVALID_DATE`].
pub fn format_date(input: &str) -> String {
    match parse_date(input) {
        Some(date) => format!("{} {}, {}", date.format("%b"), date.day(), date.year()),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Vec<Author> {
        vec![
            Author::new("Griffin Chure").equal().corr(),
            Author::new("J. Doe").equal(),
            Author::new("A. Smith").corr(),
            Author::new("R. Roe"),
        ]
    }

    // =========================================================================
    // format_authors
    // =========================================================================

    #[test]
    fn format_authors_markers_in_order() {
        assert_eq!(
            format_authors(&authors()),
            "Griffin Chure†*, J. Doe†, A. Smith*, R. Roe"
        );
    }

    #[test]
    fn format_authors_empty_and_single() {
        assert_eq!(format_authors(&[]), "");
        assert_eq!(format_authors(&[Author::new("Solo")]), "Solo");
    }

    #[test]
    fn format_authors_marker_counts() {
        let list = authors();
        let out = format_authors(&list);
        assert_eq!(out.matches(", ").count(), list.len() - 1);
        for (part, author) in out.split(", ").zip(&list) {
            assert_eq!(part.matches('†').count(), usize::from(author.equal));
            assert_eq!(part.matches('*').count(), usize::from(author.corr));
        }
    }

    #[test]
    fn format_authors_keeps_duplicate_names() {
        let list = vec![Author::new("Lee"), Author::new("Lee")];
        assert_eq!(format_authors(&list), "Lee, Lee");
    }

    // =========================================================================
    // format_authors_html
    // =========================================================================

    #[test]
    fn format_authors_html_uses_superscripts() {
        assert_eq!(
            format_authors_html(&authors()),
            "Griffin Chure<sup>†</sup><sup>*</sup>, J. Doe<sup>†</sup>, \
             A. Smith<sup>*</sup>, R. Roe"
        );
    }

    #[test]
    fn format_authors_html_escapes_names() {
        let list = vec![Author::new("Smith & <Jones>")];
        assert_eq!(format_authors_html(&list), "Smith &amp; &lt;Jones&gt;");
    }

    // =========================================================================
    // emphasize_author
    // =========================================================================

    #[test]
    fn emphasize_wraps_only_owner() {
        assert_eq!(
            emphasize_author("Griffin Chure† and J. Doe"),
            r#"<strong class="emphasized-author">Griffin Chure†</strong> and J. Doe"#
        );
    }

    #[test]
    fn emphasize_includes_marker_run() {
        assert_eq!(
            emphasize_author("A, Griffin Chure†*, B"),
            r#"A, <strong class="emphasized-author">Griffin Chure†*</strong>, B"#
        );
    }

    #[test]
    fn emphasize_every_occurrence() {
        let out = emphasize_author("Griffin Chure, Griffin Chure*");
        assert_eq!(out.matches("<strong").count(), 2);
    }

    #[test]
    fn emphasize_leaves_other_text() {
        assert_eq!(emphasize_author("J. Doe, A. Smith"), "J. Doe, A. Smith");
        assert_eq!(emphasize_author("griffin chure"), "griffin chure");
    }

    #[test]
    fn emphasize_twice_double_wraps() {
        let once = emphasize_author("Griffin Chure");
        let twice = emphasize_author(&once);
        assert_eq!(
            twice,
            r#"<strong class="emphasized-author"><strong class="emphasized-author">Griffin Chure</strong></strong>"#
        );
    }

    #[test]
    fn emphasize_name_custom_and_escaped() {
        assert_eq!(
            emphasize_name("A. (Ann) Lee*, Bo", "A. (Ann) Lee"),
            r#"<strong class="emphasized-author">A. (Ann) Lee*</strong>, Bo"#
        );
        // the dot is literal, not a wildcard
        assert_eq!(emphasize_name("AX (Ann) Lee", "A. (Ann) Lee"), "AX (Ann) Lee");
    }

    #[test]
    fn emphasize_name_empty_is_noop() {
        assert_eq!(emphasize_name("anything†", ""), "anything†");
    }

    #[test]
    fn emphasize_on_formatted_list() {
        let out = emphasize_author(&format_authors_html(&authors()));
        assert!(out.starts_with(r#"<strong class="emphasized-author">Griffin Chure</strong><sup>"#));
    }

    // =========================================================================
    // format_date
    // =========================================================================

    #[test]
    fn format_date_iso_day() {
        assert_eq!(format_date("2024-01-05"), "Jan 5, 2024");
        assert_eq!(format_date("2019-11-30"), "Nov 30, 2019");
    }

    #[test]
    fn format_date_partial_iso() {
        assert_eq!(format_date("2020"), "Jan 1, 2020");
        assert_eq!(format_date("2021-07"), "Jul 1, 2021");
    }

    #[test]
    fn format_date_timestamp_normalized_to_utc() {
        assert_eq!(format_date("2023-12-31T23:30:00-05:00"), "Jan 1, 2024");
        assert_eq!(format_date("2023-12-31T10:00:00Z"), "Dec 31, 2023");
        assert_eq!(format_date("2023-03-04T08:15"), "Mar 4, 2023");
    }

    #[test]
    fn format_date_long_forms() {
        assert_eq!(format_date("March 3, 2021"), "Mar 3, 2021");
        assert_eq!(format_date("Sep 12, 2018"), "Sep 12, 2018");
        assert_eq!(format_date("2018/09/12"), "Sep 12, 2018");
    }

    #[test]
    fn format_date_trims_whitespace() {
        assert_eq!(format_date("  2024-01-05\n"), "Jan 5, 2024");
    }

    #[test]
    fn format_date_invalid_is_placeholder() {
        assert_eq!(format_date("not a date"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
        assert_eq!(format_date("2024-02-30"), INVALID_DATE);
        assert_eq!(format_date("2024-13"), INVALID_DATE);
    }
}
