//! Date coercion for loosely typed cells

use crate::types::CellValue;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Output format of reformatted date columns
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Slash dates are read month-first when ambiguous.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Interpret a cell as a calendar date-time.
///
/// Date cells pass through, numbers are Excel serial dates, text is tried
/// against the accepted formats. Anything else yields `None`.
pub fn coerce_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => excel_serial_to_datetime(*n),
        CellValue::Text(s) => parse_date_text(s),
        CellValue::Empty => None,
    }
}

/// Parse free text as a date-time using the accepted formats
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert an Excel serial (1900 date system) to a date-time.
///
/// Serial 1 is 1900-01-01. Excel counts a phantom 1900-02-29 (serial 60),
/// so serials from 61 on are offset by one day.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial >= 2_958_466.0 {
        return None;
    }

    let days = serial.trunc() as i64;
    let base = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let seconds = (serial.fract() * 86_400.0).round() as i64;

    base.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Render as `DD/MM/YYYY`
pub fn format_day_first(dt: &NaiveDateTime) -> String {
    dt.format(DAY_FIRST_FORMAT).to_string()
}
