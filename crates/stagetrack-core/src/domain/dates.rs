//! Calendar date parsing and formatting
//!
//! Dates travel as ISO `YYYY-MM-DD` strings. An empty or unparseable string
//! means "no date" and never produces an error.

use chrono::NaiveDate;

/// ISO date format used on the wire and in the change log
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO date, treating empty or malformed input as absent.
///
/// Full timestamps (`2025-01-01T00:00:00Z`) are accepted and truncated to
/// their date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let date_part = match value.split_once('T') {
        Some((date, _)) => date,
        None => value,
    };

    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Raw string value of an optional date ("" when absent)
pub fn date_value(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// Whole days between two dates (negative when `end` precedes `start`)
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Serde adapter for `Option<NaiveDate>` fields stored as ISO strings.
///
/// Serializes `None` as `""`; deserializes `null`, `""`, and malformed
/// strings to `None`.
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::date_value(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_date))
    }
}
