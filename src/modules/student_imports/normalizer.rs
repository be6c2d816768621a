//! Canonicalization of raw spreadsheet cells.
//!
//! Both functions are total: malformed input degrades to an empty or absent
//! value instead of an error.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Formats tried, in order, for free-text birth dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Largest serial day a spreadsheet can represent (9999-12-31).
const MAX_SERIAL_DAY: u64 = 2_958_465;

/// Keeps digits and a leading `+`.
///
/// Returns `None` when the input is absent or blank.
pub fn normalize_phone(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let mut normalized = String::with_capacity(raw.len());
    if raw.starts_with('+') {
        normalized.push('+');
    }
    normalized.extend(raw.chars().filter(char::is_ascii_digit));

    Some(normalized)
}

/// Parses a birth date written in any of the common spreadsheet notations.
///
/// Returns `None` when nothing matches; callers decide whether a missing date
/// is acceptable.
pub fn parse_birth_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(datetime.date());
    }

    parse_serial_day(raw)
}

/// Spreadsheet serial dates count days from 1899-12-30.
fn parse_serial_day(raw: &str) -> Option<NaiveDate> {
    let serial = raw.parse::<f64>().ok()?;
    if !serial.is_finite() || serial < 1.0 || serial.trunc() as u64 > MAX_SERIAL_DAY {
        return None;
    }

    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_normalize_phone_strips_formatting() {
        assert_eq!(
            normalize_phone(Some("+62 812-3456-7890")),
            Some("+6281234567890".to_string())
        );
        assert_eq!(
            normalize_phone(Some("(021) 555 0101")),
            Some("0215550101".to_string())
        );
    }

    #[test]
    fn test_normalize_phone_plus_only_when_leading() {
        assert_eq!(normalize_phone(Some("0812+34")), Some("081234".to_string()));
        assert_eq!(normalize_phone(Some("  +1 555")), Some("+1555".to_string()));
    }

    #[test]
    fn test_normalize_phone_empty_input() {
        assert_eq!(normalize_phone(None), None);
        assert_eq!(normalize_phone(Some("   ")), None);
        assert_eq!(normalize_phone(Some("n/a")), Some(String::new()));
    }

    #[test]
    fn test_parse_birth_date_formats() {
        assert_eq!(parse_birth_date(Some("2010-01-15")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("2010/01/15")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("15/01/2010")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("15-01-2010")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("15.01.2010")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("15 January 2010")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("January 15, 2010")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("15 Jan 2010")), date(2010, 1, 15));
    }

    #[test]
    fn test_parse_birth_date_timestamps() {
        assert_eq!(
            parse_birth_date(Some("2010-01-15T08:30:00+07:00")),
            date(2010, 1, 15)
        );
        assert_eq!(
            parse_birth_date(Some("2010-01-15 00:00:00")),
            date(2010, 1, 15)
        );
    }

    #[test]
    fn test_parse_birth_date_spreadsheet_serial() {
        assert_eq!(parse_birth_date(Some("40193")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("40193.0")), date(2010, 1, 15));
        assert_eq!(parse_birth_date(Some("0")), None);
        assert_eq!(parse_birth_date(Some("99999999")), None);
    }

    #[test]
    fn test_parse_birth_date_garbage_is_none() {
        assert_eq!(parse_birth_date(None), None);
        assert_eq!(parse_birth_date(Some("")), None);
        assert_eq!(parse_birth_date(Some("sometime in spring")), None);
        assert_eq!(parse_birth_date(Some("2010-02-30")), None);
    }
}
