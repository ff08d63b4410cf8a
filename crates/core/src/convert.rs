//! Cell value conversion per field type and null policy.

use crate::error::ConvertError;
use crate::field::{DataType, Field};
use crate::value::RawValue;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Output layout for date fields.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Token the upstream export tool uses in place of a line break.
pub const LINE_BREAK_TOKEN: char = '|';

// Two-digit-year layouts come first: `%Y` would otherwise read "24" as year 24.
const DATETIME_LAYOUTS: [&str; 14] = [
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_LAYOUTS: [&str; 9] = [
    "%m/%d/%y",
    "%m-%d-%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

// Text dates before this year are treated as misread input.
const MIN_TEXT_YEAR: i32 = 1000;

// Last serial Excel can display (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert a raw source value to display text for `field`.
///
/// Empty values become the field's null value. Only date fields can fail.
pub fn convert(raw: &RawValue, field: &Field) -> Result<String, ConvertError> {
    if raw.is_empty() {
        return Ok(field.null_value.clone());
    }

    match field.data_type {
        DataType::String => Ok(raw.to_string().replace(LINE_BREAK_TOKEN, "\n")),
        DataType::Date => Ok(parse_date(raw)?.format(DATE_FORMAT).to_string()),
        DataType::Other => Ok(raw.to_string()),
    }
}

/// Interpret a raw value as a calendar date.
pub fn parse_date(raw: &RawValue) -> Result<NaiveDate, ConvertError> {
    match raw {
        RawValue::DateTime(dt) => Ok(dt.date()),
        RawValue::String(s) => parse_date_text(s),
        RawValue::Int(i) => excel_serial_to_date(*i as f64),
        RawValue::Float(f) => excel_serial_to_date(*f),
        RawValue::Bool(_) | RawValue::Empty => Err(ConvertError::NotADate {
            kind: raw.kind(),
            value: raw.to_string(),
        }),
    }
}

fn parse_date_text(text: &str) -> Result<NaiveDate, ConvertError> {
    let date = parse_date_layouts(text.trim())
        .ok_or_else(|| ConvertError::InvalidDate(text.to_string()))?;
    if date.year() < MIN_TEXT_YEAR {
        return Err(ConvertError::InvalidDate(text.to_string()));
    }
    Ok(date)
}

fn parse_date_layouts(trimmed: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(dt.date());
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            return Some(date);
        }
    }

    None
}

/// Convert an Excel 1900-system serial to a date, honouring the phantom 1900-02-29.
fn excel_serial_to_date(serial: f64) -> Result<NaiveDate, ConvertError> {
    if !serial.is_finite() || serial < 1.0 || serial >= MAX_EXCEL_SERIAL + 1.0 {
        return Err(ConvertError::SerialOutOfRange(serial));
    }

    let days = serial.floor() as i64;
    let epoch = if days < 61 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    }
    .ok_or(ConvertError::SerialOutOfRange(serial))?;

    // Serial 60 is the day Excel invents; clamp it to the 28th.
    let days = if days == 60 { 59 } else { days };
    epoch
        .checked_add_signed(Duration::days(days))
        .ok_or(ConvertError::SerialOutOfRange(serial))
}
