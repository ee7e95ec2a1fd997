//! Date cell normalisation to the `YYYYMMDD` form used by the records.

use chrono::NaiveDate;

const ACCEPTED_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%Y%m%d"];

/// Parse a date cell into `YYYYMMDD`.
///
/// Accepts `DD/MM/YYYY`, `YYYY-MM-DD` or `YYYYMMDD`, optionally followed by a
/// time part after a space or `T`, which is ignored.
pub fn normalize_date(value: &str) -> Option<String> {
    let date_part = value
        .trim()
        .split([' ', 'T'])
        .next()
        .unwrap_or_default();
    if date_part.is_empty() {
        return None;
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .map(|date| date.format("%Y%m%d").to_string())
}

/// Normalise a date cell, keeping the raw text when it is not a date so the
/// row can be rejected with the offending value later.
pub fn normalize_date_cell(value: &str) -> String {
    normalize_date(value).unwrap_or_else(|| value.trim().to_string())
}
