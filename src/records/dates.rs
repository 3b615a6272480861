//! Month arithmetic and date parsing
//!
//! Every month in the engine is a `NaiveDate` pinned to the first day of the month.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{ProjectionError, Result};

/// Date formats accepted for full dates, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Placeholders the source spreadsheets use for "no date"
const MISSING_MARKERS: [&str; 5] = ["", "n.a.", "na", "n/a", "-"];

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Build a month from year and calendar month (1-12)
pub fn month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Shift a month forward by `n` months
pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(n))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of whole months from `from` to `to` (negative if `to` is earlier)
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year() - from.year());
    years * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Parse a month from `YYYY-MM`, or from any accepted full-date format
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();

    // Spreadsheet exports often carry a time component
    let date_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Ok(month_start(date));
        }
    }

    // Year-month only
    for sep in ['-', '/'] {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{date_part}{sep}01"), &format!("%Y{sep}%m{sep}%d")) {
            return Ok(date);
        }
    }

    Err(ProjectionError::InvalidMonth(value.to_string()))
}

/// Parse a date that may be missing; placeholders and unparseable text become `None`
pub fn parse_optional_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if MISSING_MARKERS.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        return None;
    }
    parse_month(trimmed).ok()
}
