//! Result extraction from a normalized row.
//!
//! The facility decision is pulled out of free-form model prose, so this is
//! best-effort by nature. The failure mode is always an empty facility, which
//! keeps the result `Pending`; it never guesses a facility that is not in the text.

use super::types::RouteResult;
use crate::table::{Row, DECODED_TAGS_COLUMN, ROUTE_ANALYSIS_COLUMN, SELECTED_FACILITY_COLUMN};
use regex::Regex;
use std::sync::LazyLock;

/// Decision-line prefix the routing prompt asks the model to end with.
pub const BEST_MATCH_PREFIX: &str = "BEST MATCH:";

/// Facility strings longer than this are treated as sentences and shortened.
pub const LONG_FACILITY_CHARS: usize = 50;

/// A capitalized phrase around a facility-type noun, with an optional
/// parenthesised qualifier: `PPS South (Kolej)`, `Dewan Serbaguna Taman Ria`.
static FACILITY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[A-Z][\w'-]*\s+)*\b(?:PPS|Dewan|Sekolah|Kolej|Masjid|Surau|Balai|Hall|School|Centre|Center|Shelter|College|Mosque|Church)\b(?:\s+[A-Z][\w'-]*)*(?:\s*\([^)]*\))?",
    )
    .expect("facility pattern is valid")
});

/// Words that end the name part of a sentence-like facility string.
const CLAUSE_WORDS: [&str; 5] = [" because ", " since ", " which ", " as it ", " due to "];

/// Fields pulled from a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub decoded_tags: String,
    pub analysis_text: String,
    pub selected_facility: String,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        !self.analysis_text.trim().is_empty() && !self.selected_facility.trim().is_empty()
    }

    pub fn into_result(self, raw_row: Option<Row>) -> RouteResult {
        RouteResult::from_parts(
            self.decoded_tags,
            self.analysis_text,
            self.selected_facility,
            raw_row,
        )
    }
}

/// Extract tags, analysis and the selected facility from `row`.
///
/// The facility is taken from, in order: the last marker line of the analysis
/// text, a marker line in the dedicated decision column, or the decision column
/// itself. With none of those the facility stays empty.
pub fn extract(row: &Row) -> Extraction {
    let decoded_tags = row.text(DECODED_TAGS_COLUMN).unwrap_or_default().to_string();
    let analysis_text = row.text(ROUTE_ANALYSIS_COLUMN).unwrap_or_default().to_string();
    let decision = row.text(SELECTED_FACILITY_COLUMN);

    let selected_facility = find_best_match(&analysis_text)
        .or_else(|| decision.and_then(find_best_match))
        .or_else(|| decision.map(clean_facility))
        .unwrap_or_default();

    Extraction {
        decoded_tags,
        analysis_text,
        selected_facility,
    }
}

/// Facility named on the last marker line of `text`, cleaned.
///
/// Matching is case-insensitive and ignores leading markdown emphasis, heading
/// or list characters. Returns `None` when no marker line exists or the line
/// names nothing.
pub fn find_best_match(text: &str) -> Option<String> {
    let remainder = text.lines().rev().find_map(|line| {
        let line = line
            .trim()
            .trim_start_matches(|c: char| matches!(c, '*' | '#' | '-' | '>' | '_') || c.is_whitespace());
        let head = line.get(..BEST_MATCH_PREFIX.len())?;
        head.eq_ignore_ascii_case(BEST_MATCH_PREFIX)
            .then(|| &line[BEST_MATCH_PREFIX.len()..])
    })?;

    let facility = clean_facility(remainder);
    (!facility.is_empty()).then_some(facility)
}

/// Trim decoration and trailing punctuation; shorten sentence-like values.
pub fn clean_facility(raw: &str) -> String {
    let cleaned = strip_decoration(raw);
    if cleaned.chars().count() <= LONG_FACILITY_CHARS {
        return cleaned.to_string();
    }

    if let Some(found) = FACILITY_NAME.find(cleaned) {
        let name = found.as_str().trim();
        let name = name.strip_prefix("The ").unwrap_or(name);
        return strip_decoration(name).to_string();
    }

    strip_decoration(first_clause(cleaned)).to_string()
}

fn strip_decoration(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '`' | '_') || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!') || c.is_whitespace())
        .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '`') || c.is_whitespace())
}

fn first_clause(text: &str) -> &str {
    let punct = text.find(|c: char| matches!(c, '.' | ',' | ';' | '!' | '?' | '\n'));
    let word = CLAUSE_WORDS.iter().filter_map(|w| text.find(w)).min();
    match (punct, word) {
        (Some(a), Some(b)) => &text[..a.min(b)],
        (Some(i), None) | (None, Some(i)) => &text[..i],
        (None, None) => text,
    }
}
