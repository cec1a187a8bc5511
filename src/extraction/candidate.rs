use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Confidence of plain numeric and label-anchored matches
pub const NUMERIC_CONFIDENCE: f32 = 1.0;
/// Confidence of matches with a spelled out month
pub const MONTH_NAME_CONFIDENCE: f32 = 1.2;
/// Confidence of a production date and expiry date found together
pub const PRODUCTION_EXPIRY_CONFIDENCE: f32 = 1.5;

/// Inclusive range of plausible years
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Canonical `DD.MM.YYYY` form used everywhere a date leaves the engine
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn year_in_range(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// A parsed date hypothesis from one pattern match
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub confidence: f32,
    /// Trimmed source line, diagnostic only
    pub line: String,
    pub production_date: Option<NaiveDate>,
    /// Name of the pattern that produced this candidate
    pub pattern: &'static str,
}

impl Candidate {
    pub fn date_str(&self) -> String {
        format_date(self.date)
    }

    pub fn production_date_str(&self) -> Option<String> {
        self.production_date.map(format_date)
    }
}

/// Serializable view of a candidate with dates in canonical form
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub date: String,
    pub confidence: f32,
    pub line: String,
    pub production_date: Option<String>,
    pub pattern: &'static str,
}

impl From<&Candidate> for CandidateView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            date: candidate.date_str(),
            confidence: candidate.confidence,
            line: candidate.line.clone(),
            production_date: candidate.production_date_str(),
            pattern: candidate.pattern,
        }
    }
}

/// Why a single match did not become a candidate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("capture group '{0}' is missing or not a number")]
    MalformedGroup(String),

    #[error("unknown month name '{0}'")]
    UnknownMonth(String),

    #[error("'{0}' is not a calendar date")]
    InvalidDate(String),

    #[error("year {0} outside 2000-2100")]
    YearOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_pads_day_and_month() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(format_date(date), "04.03.2025");
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let at = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
        assert!(year_in_range(at(2000)));
        assert!(year_in_range(at(2100)));
        assert!(!year_in_range(at(1999)));
        assert!(!year_in_range(at(2101)));
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(
            SkipReason::YearOutOfRange(1999).to_string(),
            "year 1999 outside 2000-2100"
        );
    }
}
