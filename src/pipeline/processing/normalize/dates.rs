//! Date coercion for export cells.
//!
//! Exports carry dates as real date cells, ISO strings, US or European
//! slash dates, or spelled-out months. Timestamps with an offset are moved
//! to UTC before the calendar day is taken.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::{DecisionDate, FieldValue};
use crate::error::{Result, TrackerError};

/// Timestamp layouts carrying an explicit offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Timestamp layouts without an offset, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Plain date layouts. Slash dates are read month-first, falling back to
/// day-first when the month is out of range.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
];

/// Parse a date string in any of the supported layouts.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Strict coercion: a present value that is not a date is an error.
///
/// Returns `Ok(None)` when the cell is missing so callers can decide whether
/// the field is required.
pub fn parse_strict(field: &str, value: Option<&FieldValue>) -> Result<Option<NaiveDate>> {
    let value = match value {
        Some(v) if v.is_present() => v,
        _ => return Ok(None),
    };

    let parsed = match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::DateTime(dt) => Some(dt.date_naive()),
        FieldValue::Text(s) => parse_date_text(s),
        _ => None,
    };

    match parsed {
        Some(date) => Ok(Some(date)),
        None => Err(TrackerError::InvalidDate {
            field: field.to_string(),
            value: value.as_text().unwrap_or_default(),
        }),
    }
}

/// Lenient coercion: anything that is not a recognizable date is unknown.
pub fn parse_lenient(value: Option<&FieldValue>) -> DecisionDate {
    match value {
        Some(FieldValue::Date(d)) => DecisionDate::Known(*d),
        Some(FieldValue::DateTime(dt)) => DecisionDate::Known(dt.date_naive()),
        Some(FieldValue::Text(s)) => parse_date_text(s).into(),
        _ => DecisionDate::Unknown,
    }
}

/// Cell value written back into a record after lenient coercion.
pub fn decision_cell(date: DecisionDate) -> FieldValue {
    date.date().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_common_layouts() {
        assert_eq!(parse_date_text("2021-01-05"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("2021/01/05"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("01/05/2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("25/12/2021"), Some(ymd(2021, 12, 25)));
        assert_eq!(parse_date_text("5 January 2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("January 5, 2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("05-Jan-2021"), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(parse_date_text("2021-01-05T10:30:00Z"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date_text("2021-01-05 10:30:00"), Some(ymd(2021, 1, 5)));
        // Late evening west of UTC lands on the next UTC day
        assert_eq!(parse_date_text("2021-01-05 23:30:00-05:00"), Some(ymd(2021, 1, 6)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date_text("bad-date"), None);
        assert_eq!(parse_date_text("2021-02-30"), None);
        assert_eq!(parse_date_text("   "), None);
    }

    #[test]
    fn test_strict_missing_is_none() {
        assert!(parse_strict("submission_date", None).unwrap().is_none());
        assert!(parse_strict("submission_date", Some(&FieldValue::Null)).unwrap().is_none());
        assert!(parse_strict("submission_date", Some(&"".into())).unwrap().is_none());
    }

    #[test]
    fn test_strict_rejects_unparseable() {
        let err = parse_strict("submission_date", Some(&"not a date".into())).unwrap_err();
        match err {
            TrackerError::InvalidDate { field, value } => {
                assert_eq!(field, "submission_date");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_strict("submission_date", Some(&FieldValue::Integer(44201))).is_err());
    }

    #[test]
    fn test_strict_accepts_date_cells() {
        let date = ymd(2021, 1, 5);
        assert_eq!(
            parse_strict("submission_date", Some(&FieldValue::Date(date))).unwrap(),
            Some(date)
        );
    }

    #[test]
    fn test_lenient_falls_back_to_unknown() {
        assert_eq!(parse_lenient(Some(&"bad-date".into())), DecisionDate::Unknown);
        assert_eq!(parse_lenient(None), DecisionDate::Unknown);
        assert_eq!(parse_lenient(Some(&FieldValue::Float(f64::NAN))), DecisionDate::Unknown);
        assert_eq!(
            parse_lenient(Some(&"2021-02-01".into())),
            DecisionDate::Known(ymd(2021, 2, 1))
        );
    }
}
