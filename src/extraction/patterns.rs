//! Ordered date pattern table
//!
//! Patterns are matched case-insensitively in declaration order. Turkish letters
//! also accept the ASCII letter OCR tends to produce instead (`İ`/`I`, `Ş`/`S`, ...).

use once_cell::sync::Lazy;
use regex::Regex;

/// Parsing strategy attached to a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Whole match parsed with a chrono format after `/` is normalized to `.`
    NumericFixed { format: &'static str },
    /// Groups are day, month, year; 2-digit years are expanded to 20YY
    NumericLoose,
    /// Groups are day, full month name, year
    MonthName,
    /// Groups are day, 3-letter month abbreviation, year
    MonthAbbr,
    /// Groups are production day/month/year followed by expiry day/month/year
    ProductionAndExpiry,
}

/// A compiled date rule
#[derive(Debug)]
pub struct DatePattern {
    pub name: &'static str,
    pub regex: Regex,
    pub kind: FormatKind,
}

const RULES: &[(&str, &str, FormatKind)] = &[
    (
        "numeric-4digit",
        r"\d{2}[./]\d{2}[./]\d{4}",
        FormatKind::NumericFixed { format: "%d.%m.%Y" },
    ),
    (
        "numeric-2digit",
        r"\d{2}[./]\d{2}[./]\d{2}",
        FormatKind::NumericFixed { format: "%d.%m.%y" },
    ),
    (
        "numeric-spaced",
        r"(\d{2})\s*[./]\s*(\d{2})\s*[./]\s*(\d{2,4})",
        FormatKind::NumericLoose,
    ),
    (
        "skt",
        r"SKT[:\s]*(\d{2})[./](\d{2})[./](\d{2,4})",
        FormatKind::NumericLoose,
    ),
    (
        "s.k.t",
        r"S\.K\.T[:\s]*(\d{2})[./](\d{2})[./](\d{2,4})",
        FormatKind::NumericLoose,
    ),
    (
        "son-kullanma",
        r"Son\s*Kul\w*\s*Tar\w*[:\s]*(\d{2})[./](\d{2})[./](\d{2,4})",
        FormatKind::NumericLoose,
    ),
    (
        "month-name",
        r"(\d{1,2})\s*(OCAK|[ŞS]UBAT|MART|N[Iİı]SAN|MAY[Iİı]S|HAZ[Iİı]RAN|TEMMUZ|A[ĞG]USTOS|EYL[ÜU]L|EK[Iİı]M|KAS[Iİı]M|ARAL[Iİı]K)\s*(\d{2,4})",
        FormatKind::MonthName,
    ),
    (
        "month-abbr",
        r"(\d{1,2})\s*(OCA|[ŞS]UB|MAR|N[Iİı]S|MAY|HAZ|TEM|A[ĞG]U|EYL|EK[Iİı]|KAS|ARA)\s*(\d{2,4})",
        FormatKind::MonthAbbr,
    ),
    (
        "production-expiry",
        r"[ÜU]ret[Iİı]m:\s*(\d{2})[./](\d{2})[./](\d{2,4}).*S\.?K\.?T\.?:?\s*(\d{2})[./](\d{2})[./](\d{2,4})",
        FormatKind::ProductionAndExpiry,
    ),
];

/// The rule set, compiled once
pub static PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|&(name, pattern, kind)| DatePattern {
            name,
            regex: Regex::new(&format!("(?i){}", pattern))
                .unwrap_or_else(|e| panic!("Failed to compile date pattern '{name}': {e}")),
            kind,
        })
        .collect()
});

/// Month names in ASCII-folded upper case, January first
const MONTHS: [&str; 12] = [
    "OCAK", "SUBAT", "MART", "NISAN", "MAYIS", "HAZIRAN", "TEMMUZ", "AGUSTOS", "EYLUL", "EKIM",
    "KASIM", "ARALIK",
];

/// Upper-case and strip Turkish diacritics so `Şubat`, `SUBAT` and `şubat` compare equal
fn fold(name: &str) -> String {
    name.chars()
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'İ' => 'I',
            'Ş' => 'S',
            'Ğ' => 'G',
            'Ü' => 'U',
            'Ö' => 'O',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Resolve a full Turkish month name to its number (1-12)
pub fn month_from_name(name: &str) -> Option<u32> {
    let folded = fold(name);
    MONTHS
        .iter()
        .position(|m| *m == folded)
        .map(|i| i as u32 + 1)
}

/// Resolve a 3-letter Turkish month abbreviation to its number (1-12)
pub fn month_from_abbr(abbr: &str) -> Option<u32> {
    let folded = fold(abbr);
    if folded.chars().count() != 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(folded.as_str()))
        .map(|i| i as u32 + 1)
}
