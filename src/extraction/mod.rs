//! Date candidate extraction from recognized text
//!
//! The extractor is permissive: every pattern is tried on every line and every
//! match that resolves to a plausible date becomes a candidate. Picking one is
//! left to [`crate::ranking`].

pub mod candidate;
pub mod patterns;

pub use candidate::{Candidate, CandidateView, SkipReason};
pub use patterns::{DatePattern, FormatKind, PATTERNS};

use candidate::{
    year_in_range, MONTH_NAME_CONFIDENCE, NUMERIC_CONFIDENCE, PRODUCTION_EXPIRY_CONFIDENCE,
};
use chrono::{Datelike, NaiveDate};
use regex::Captures;

/// A match that did not become a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub pattern: &'static str,
    pub matched: String,
    pub reason: SkipReason,
}

/// Everything the extractor found in one text
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<Skipped>,
}

/// Extract all date candidates from recognized `text`, in line then pattern order
pub fn extract(text: &str) -> Vec<Candidate> {
    extract_report(text).candidates
}

/// Like [`extract`], also returning the matches that were discarded and why
pub fn extract_report(text: &str) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for line in text.lines() {
        for pattern in PATTERNS.iter() {
            for caps in pattern.regex.captures_iter(line) {
                match build_candidate(pattern, &caps, line) {
                    Ok(candidate) => report.candidates.push(candidate),
                    Err(reason) => {
                        let matched = caps[0].to_string();
                        tracing::debug!(
                            "Skipping '{}' from pattern {}: {}",
                            matched,
                            pattern.name,
                            reason
                        );
                        report.skipped.push(Skipped {
                            pattern: pattern.name,
                            matched,
                            reason,
                        });
                    }
                }
            }
        }
    }

    report
}

/// Turn a single match into a candidate according to the pattern's format kind
pub fn build_candidate(
    pattern: &DatePattern,
    caps: &Captures<'_>,
    line: &str,
) -> Result<Candidate, SkipReason> {
    let (date, production_date, confidence) = match pattern.kind {
        FormatKind::NumericFixed { format } => {
            let normalized = caps[0].replace('/', ".");
            let date = NaiveDate::parse_from_str(&normalized, format)
                .map_err(|_| SkipReason::InvalidDate(normalized.clone()))?;
            (checked_year(strptime_century(date, format))?, None, NUMERIC_CONFIDENCE)
        }
        FormatKind::NumericLoose => (dmy(caps, 1)?, None, NUMERIC_CONFIDENCE),
        FormatKind::MonthName | FormatKind::MonthAbbr => {
            let day = number(caps, 1)?;
            let name = group(caps, 2)?;
            let resolved = if pattern.kind == FormatKind::MonthName {
                patterns::month_from_name(name)
            } else {
                patterns::month_from_abbr(name)
            };
            let month = resolved.ok_or_else(|| SkipReason::UnknownMonth(name.to_string()))?;
            let year = year(caps, 3)?;
            (calendar_date(day, month, year)?, None, MONTH_NAME_CONFIDENCE)
        }
        FormatKind::ProductionAndExpiry => {
            let production = dmy(caps, 1)?;
            let expiry = dmy(caps, 4)?;
            (expiry, Some(production), PRODUCTION_EXPIRY_CONFIDENCE)
        }
    };

    Ok(Candidate {
        date,
        confidence,
        line: line.trim().to_string(),
        production_date,
        pattern: pattern.name,
    })
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> Result<&'t str, SkipReason> {
    caps.get(index)
        .map(|m| m.as_str().trim())
        .ok_or_else(|| SkipReason::MalformedGroup(format!("#{}", index)))
}

fn number(caps: &Captures<'_>, index: usize) -> Result<u32, SkipReason> {
    let raw = group(caps, index)?;
    raw.parse()
        .map_err(|_| SkipReason::MalformedGroup(raw.to_string()))
}

/// Year group with 2-digit values expanded to 20YY
fn year(caps: &Captures<'_>, index: usize) -> Result<i32, SkipReason> {
    let raw = group(caps, index)?;
    let value: i32 = raw
        .parse()
        .map_err(|_| SkipReason::MalformedGroup(raw.to_string()))?;
    Ok(if raw.len() == 2 { 2000 + value } else { value })
}

/// Day, month and year from three consecutive groups starting at `first`
fn dmy(caps: &Captures<'_>, first: usize) -> Result<NaiveDate, SkipReason> {
    let day = number(caps, first)?;
    let month = number(caps, first + 1)?;
    let year = year(caps, first + 2)?;
    calendar_date(day, month, year)
}

fn calendar_date(day: u32, month: u32, year: i32) -> Result<NaiveDate, SkipReason> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SkipReason::InvalidDate(format!("{:02}.{:02}.{}", day, month, year)))?;
    checked_year(date)
}

/// chrono reads `%y` as 2000-2069 / 1970-1999; strptime puts 69 in the 1900s
fn strptime_century(date: NaiveDate, format: &str) -> NaiveDate {
    if format.contains("%y") && date.year() == 2069 {
        date.with_year(1969).unwrap_or(date)
    } else {
        date
    }
}

fn checked_year(date: NaiveDate) -> Result<NaiveDate, SkipReason> {
    if year_in_range(date) {
        Ok(date)
    } else {
        Err(SkipReason::YearOutOfRange(date.year()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(|c| c.date_str()).collect()
    }

    #[test]
    fn test_plain_date_is_found() {
        let candidates = extract("Parti No: 4411\n31.12.2025\n");
        assert!(dates(&candidates).contains(&"31.12.2025".to_string()));
        assert!(candidates.iter().all(|c| c.confidence == NUMERIC_CONFIDENCE));
    }

    #[test]
    fn test_slash_separator_is_normalized() {
        let candidates = extract("TETT 05/06/2027");
        assert_eq!(candidates[0].date_str(), "05.06.2027");
        assert_eq!(candidates[0].pattern, "numeric-4digit");
    }

    #[test]
    fn test_every_valid_date_round_trips() {
        for (day, month, year) in [(1, 1, 2000), (29, 2, 2024), (15, 8, 2051), (31, 12, 2100)] {
            let expected = format!("{:02}.{:02}.{}", day, month, year);
            let text = format!("noise line\nSKT {} LOT 7\n", expected);
            assert!(
                dates(&extract(&text)).contains(&expected),
                "{} not extracted",
                expected
            );
        }
    }

    #[test]
    fn test_text_without_dates_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("İÇİNDEKİLER: un, şeker, tuz\nNet 500 g\n").is_empty());
    }

    #[test]
    fn test_month_name_resolution() {
        let candidates = extract("14 MART 2025");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].date_str(), "14.03.2025");
        assert_eq!(candidates[0].confidence, MONTH_NAME_CONFIDENCE);
        assert_eq!(candidates[0].pattern, "month-name");
    }

    #[test]
    fn test_month_abbr_pads_day_and_expands_year() {
        let candidates = extract("TETT: 7 AĞU 26");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].date_str(), "07.08.2026");
        assert_eq!(candidates[0].confidence, MONTH_NAME_CONFIDENCE);
    }

    #[test]
    fn test_production_and_expiry_pairing() {
        let candidates = extract("Üretim: 01.01.24 SKT: 01.01.26");
        let paired: Vec<_> = candidates
            .iter()
            .filter(|c| c.pattern == "production-expiry")
            .collect();
        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].date_str(), "01.01.2026");
        assert_eq!(paired[0].production_date_str().as_deref(), Some("01.01.2024"));
        assert_eq!(paired[0].confidence, PRODUCTION_EXPIRY_CONFIDENCE);
    }

    #[test]
    fn test_two_digit_fixed_year_uses_strptime_pivot() {
        // %y maps 99 to 1999, which is then out of range
        let report = extract_report("01.02.99");
        assert!(report.candidates.iter().all(|c| c.date_str() != "01.02.1999"));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.pattern == "numeric-2digit" && s.reason == SkipReason::YearOutOfRange(1999)));
    }

    #[test]
    fn test_two_digit_fixed_year_69_is_last_century() {
        let report = extract_report("01.02.69");
        assert!(report
            .candidates
            .iter()
            .all(|c| c.pattern != "numeric-2digit"));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.pattern == "numeric-2digit" && s.reason == SkipReason::YearOutOfRange(1969)));

        let report = extract_report("01.02.68");
        assert!(report
            .candidates
            .iter()
            .any(|c| c.pattern == "numeric-2digit" && c.date_str() == "01.02.2068"));
    }

    #[test]
    fn test_invalid_production_half_falls_back_to_numeric() {
        let report = extract_report("Üretim: 32.13.24 SKT: 01.01.26");

        assert!(report
            .candidates
            .iter()
            .all(|c| c.pattern != "production-expiry" && c.production_date.is_none()));
        assert!(report.skipped.iter().any(|s| s.pattern == "production-expiry"
            && s.reason == SkipReason::InvalidDate("32.13.2024".to_string())));

        let fallback: Vec<_> = report
            .candidates
            .iter()
            .filter(|c| c.pattern == "numeric-2digit")
            .collect();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].date_str(), "01.01.2026");
        assert_eq!(fallback[0].confidence, NUMERIC_CONFIDENCE);
    }

    #[test]
    fn test_out_of_range_years_are_skipped() {
        let report = extract_report("10.10.1999\n10.10.2101");
        assert!(report
            .candidates
            .iter()
            .all(|c| c.date.year() != 1999 && c.date.year() != 2101));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::YearOutOfRange(1999)));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::YearOutOfRange(2101)));
    }

    #[test]
    fn test_impossible_date_is_skipped_without_aborting_line() {
        let report = extract_report("31.02.2025 ve 28.02.2025");
        assert_eq!(dates(&report.candidates)[0], "28.02.2025");
        assert!(dates(&report.candidates).iter().all(|d| d != "31.02.2025"));
        assert!(report
            .skipped
            .iter()
            .any(|s| matches!(s.reason, SkipReason::InvalidDate(_))));
    }

    #[test]
    fn test_candidate_keeps_trimmed_source_line() {
        let candidates = extract("   SKT:12.12.2026   ");
        assert!(candidates.iter().all(|c| c.line == "SKT:12.12.2026"));
    }

    #[test]
    fn test_candidates_follow_line_then_pattern_order() {
        let candidates = extract("01.01.2030\n3 MART 2031");
        assert_eq!(candidates.first().unwrap().date_str(), "01.01.2030");
        assert_eq!(candidates.last().unwrap().date_str(), "03.03.2031");
    }
}
