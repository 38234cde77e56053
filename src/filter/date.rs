//! Date filters.
//!
//! Both filters read the input's UTC calendar day, so an evening timestamp
//! never shows up as the next or previous day on a machine in another zone.

use serde_json::Value;

use crate::utils::date::DateTimeUtc;

/// Rendered in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Interpret a template value as a date.
///
/// Strings are parsed as ISO 8601; numbers are Unix epoch milliseconds.
#[allow(clippy::cast_possible_truncation)] // Fractional milliseconds are dropped
pub fn parse_date_value(value: &Value) -> Option<DateTimeUtc> {
    match value {
        Value::String(s) => DateTimeUtc::parse(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTimeUtc::from_unix_millis),
        _ => None,
    }
}

/// `readableDate`: `"Month D, YYYY"`.
pub fn readable_date(value: &Value) -> String {
    parse_date_value(value).map_or_else(|| INVALID_DATE.to_string(), DateTimeUtc::to_readable)
}

/// `htmlDateString`: `"YYYY-MM-DD"`, for `<time datetime>` attributes.
pub fn html_date_string(value: &Value) -> String {
    parse_date_value(value).map_or_else(|| INVALID_DATE.to_string(), DateTimeUtc::to_date_string)
}
