//! Candidate validation and selection

use crate::extraction::candidate::{format_date, year_in_range};
use crate::extraction::Candidate;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// Outcome of a scan as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Found {
        expiry: NaiveDate,
        production: Option<NaiveDate>,
    },
    NotFound,
}

impl Detection {
    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found { .. })
    }

    pub fn expiry_str(&self) -> Option<String> {
        match self {
            Detection::Found { expiry, .. } => Some(format_date(*expiry)),
            Detection::NotFound => None,
        }
    }

    pub fn production_str(&self) -> Option<String> {
        match self {
            Detection::Found { production, .. } => production.map(format_date),
            Detection::NotFound => None,
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Found {
                expiry,
                production: Some(production),
            } => write!(
                f,
                "{} (Üretim: {})",
                format_date(*expiry),
                format_date(*production)
            ),
            Detection::Found { expiry, .. } => f.write_str(&format_date(*expiry)),
            Detection::NotFound => f.write_str("no date found"),
        }
    }
}

/// Pick the best candidate: highest confidence, earliest on ties
pub fn select_best(candidates: &[Candidate]) -> Detection {
    best_candidate(candidates)
        .map(|c| Detection::Found {
            expiry: c.date,
            production: c.production_date,
        })
        .unwrap_or(Detection::NotFound)
}

/// Valid candidates ranked by descending confidence; ties keep encounter order
pub fn rank(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut ranked: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| year_in_range(c.date))
        .filter(|c| c.production_date.map_or(true, year_in_range))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

pub fn best_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    rank(candidates).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::extract;

    fn candidate(date: (i32, u32, u32), confidence: f32, pattern: &'static str) -> Candidate {
        Candidate {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            confidence,
            line: String::new(),
            production_date: None,
            pattern,
        }
    }

    #[test]
    fn test_empty_pool_is_not_found() {
        assert_eq!(select_best(&[]), Detection::NotFound);
        assert_eq!(Detection::NotFound.to_string(), "no date found");
        assert!(!Detection::NotFound.is_found());
    }

    #[test]
    fn test_higher_confidence_wins_regardless_of_order() {
        let low = candidate((2025, 1, 1), 1.0, "numeric-4digit");
        let high = candidate((2026, 6, 30), 1.5, "production-expiry");

        for pool in [vec![low.clone(), high.clone()], vec![high.clone(), low.clone()]] {
            assert_eq!(select_best(&pool).expiry_str().as_deref(), Some("30.06.2026"));
        }
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let pool = vec![
            candidate((2027, 2, 2), 1.0, "numeric-4digit"),
            candidate((2020, 2, 2), 1.0, "numeric-2digit"),
            candidate((2027, 2, 3), 1.0, "numeric-spaced"),
        ];
        assert_eq!(best_candidate(&pool).unwrap().pattern, "numeric-4digit");
    }

    #[test]
    fn test_out_of_range_years_never_win() {
        let pool = vec![
            candidate((1999, 12, 31), 9.0, "forged"),
            candidate((2101, 1, 1), 9.0, "forged"),
            candidate((2030, 5, 5), 1.0, "numeric-4digit"),
        ];
        assert_eq!(select_best(&pool).to_string(), "05.05.2030");
        assert_eq!(rank(&pool).len(), 1);
    }

    #[test]
    fn test_production_date_is_appended() {
        let detection = select_best(&extract("Üretim: 01.01.24 SKT: 01.01.26"));
        assert_eq!(detection.to_string(), "01.01.2026 (Üretim: 01.01.2024)");
        assert_eq!(detection.production_str().as_deref(), Some("01.01.2024"));
    }

    #[test]
    fn test_invalid_production_date_drops_annotation() {
        let detection = select_best(&extract("Üretim: 32.13.24 SKT: 01.01.26"));
        assert_eq!(detection.to_string(), "01.01.2026");
        assert_eq!(detection.production_str(), None);
    }

    #[test]
    fn test_month_name_beats_numeric() {
        let detection = select_best(&extract("15.04.2025\n20 NİSAN 2026"));
        assert_eq!(detection.to_string(), "20.04.2026");
    }

    #[test]
    fn test_no_dates_in_text_is_not_found() {
        assert_eq!(select_best(&extract("Menşei: Türkiye\nNet 1 kg")), Detection::NotFound);
    }
}
