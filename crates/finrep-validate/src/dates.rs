//! Date coercion for report cells.
//!
//! Spreadsheet extraction yields a mix of ISO strings, US-formatted
//! strings, and Excel serial day numbers; checks normalize all of them to
//! calendar dates before comparing.

use chrono::{Duration, NaiveDate};
use finrep_model::Value;

/// Accepted text formats, tried in order.
const TEXT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Serial day numbers accepted as dates (roughly 1900 through 2118).
const SERIAL_MIN: f64 = 1.0;
const SERIAL_MAX: f64 = 80_000.0;

/// Excel's day zero in the 1900 date system. The -30 offset absorbs the
/// spurious 1900 leap day.
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date")
}

/// Coerce a raw cell value to a calendar date, if possible.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(number) => from_serial(*number),
        Value::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            for format in TEXT_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return Some(date);
                }
            }
            trimmed.parse::<f64>().ok().and_then(from_serial)
        }
    }
}

fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    excel_epoch().checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Display form used when a rule marks its field as a date value.
pub fn format_mmddyyyy(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
