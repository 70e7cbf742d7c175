use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Date-only layouts tried after ISO.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Date-time layouts; `%.f` also accepts a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Epoch-millisecond values start here; below it a number is read as
/// epoch seconds, and below [`EPOCH_SECONDS_FLOOR`] as an Excel serial.
const EPOCH_MILLIS_FLOOR: f64 = 1e11;
const EPOCH_SECONDS_FLOOR: f64 = 1e8;

/// Parse an ISO-8601 date or date-time, dropping any time component.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Parse a date as it may appear in a source table: ISO first, then the
/// common slash and dotted layouts.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    parse_iso_date(s).or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    })
}

fn excel_epoch() -> NaiveDate {
    // 1899-12-30 absorbs the 1900 leap-year bug for serials after February 1900.
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Convert a bare 1900-system Excel serial day number (fraction = time of
/// day) to a date. Workbook date cells go through calamine instead.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    excel_epoch().checked_add_days(Days::new(serial.floor() as u64))
}

/// Interpret a bare number in a date column: epoch milliseconds (the
/// pandas JSON default), epoch seconds, or an Excel serial.
pub fn date_from_number(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() {
        return None;
    }
    if n.abs() >= EPOCH_MILLIS_FLOOR {
        DateTime::from_timestamp_millis(n as i64).map(|dt| dt.date_naive())
    } else if n.abs() >= EPOCH_SECONDS_FLOOR {
        DateTime::from_timestamp(n as i64, 0).map(|dt| dt.date_naive())
    } else {
        date_from_serial(n)
    }
}
