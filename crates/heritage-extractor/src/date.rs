//! Strict calendar-date parsing
//!
//! Parses the whole span against a list of chrono formats. Nothing is
//! inferred from surrounding words: "the 1920s" or "the 18th century" are
//! not dates. Missing components default to the first month and day.

use chrono::{Datelike, NaiveDate};

use heritage_core::config::DateConfig;
use heritage_core::{DateParseError, DateParser};

/// chrono-backed strict parser
#[derive(Debug, Clone)]
pub struct StrictDateParser {
    formats: Vec<String>,
}

impl StrictDateParser {
    /// Create a parser with the default formats
    pub fn new() -> Self {
        Self::with_config(&DateConfig::default())
    }

    pub fn with_config(config: &DateConfig) -> Self {
        Self {
            formats: config.formats.clone(),
        }
    }

    fn parse_year(text: &str) -> Option<NaiveDate> {
        if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year: i32 = text.parse().ok()?;
        NaiveDate::from_ymd_opt(year, 1, 1)
    }

    /// "May 1992" style dates
    fn parse_month_year(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("1 {text}"), "%d %B %Y").ok()
    }
}

impl Default for StrictDateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParser for StrictDateParser {
    fn parse_strict(&self, text: &str) -> Result<NaiveDate, DateParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DateParseError::Empty);
        }

        if let Some(date) = Self::parse_year(text) {
            return Ok(date);
        }

        // Numeric fields take any digit count ("May 1992" fits "%B %d %Y"
        // as day 19 of year 92), so the year must appear in full
        Self::parse_month_year(text)
            .into_iter()
            .chain(
                self.formats
                    .iter()
                    .filter_map(|format| NaiveDate::parse_from_str(text, format).ok()),
            )
            .find(|date| has_year_token(text, date.year()))
            .ok_or_else(|| DateParseError::Unrecognized(text.to_string()))
    }
}

/// The year appears in `text` as a standalone four-digit number
fn has_year_token(text: &str, year: i32) -> bool {
    let year = format!("{year:04}");
    text.split(|c: char| !c.is_ascii_digit())
        .any(|token| token == year)
}
