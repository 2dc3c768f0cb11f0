// Calendar date helpers shared by the timeline and event overlay
use super::error::AnalysisError;
use chrono::{Datelike, Months, NaiveDate};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%b %d %Y"];

/// Parse a calendar date written either as ISO (`2024-03-15`) or in the
/// display form used by event fixtures (`Feb 2, 2026`).
pub fn parse_date(value: &str) -> Result<NaiveDate, AnalysisError> {
    let trimmed = value.trim();
    let mut last_err = None;
    for format in DATE_FORMATS {
        match NaiveDate::parse_from_str(trimmed, format) {
            Ok(date) => return Ok(date),
            Err(e) => last_err = Some(e),
        }
    }
    Err(AnalysisError::date_parse(
        value,
        last_err.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

/// Parse a chart axis label such as `Jan 11`, which carries no year.
/// Labels that already include a year are accepted as-is.
pub fn parse_axis_label(label: &str, year: i32) -> Result<NaiveDate, AnalysisError> {
    if let Ok(date) = parse_date(label) {
        return Ok(date);
    }
    let with_year = format!("{} {}", label.trim(), year);
    NaiveDate::parse_from_str(&with_year, "%b %d %Y")
        .map_err(|e| AnalysisError::date_parse(label, e))
}

/// Resolve a year-less axis label to its latest occurrence on or before `end`,
/// so an axis running `Dec 30 .. Jan 2` keeps December in the earlier year.
pub fn resolve_axis_label(label: &str, end: NaiveDate) -> Result<NaiveDate, AnalysisError> {
    match parse_axis_label(label, end.year()) {
        Ok(date) if date <= end => Ok(date),
        _ => parse_axis_label(label, end.year() - 1),
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Number of whole months from `earlier` to `later`.
///
/// A month only counts once the day of month is reached again, so
/// 2024-01-15 -> 2024-03-14 is one month and 2024-01-15 -> 2024-03-15 is two.
/// Negative when `later` precedes `earlier`.
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i32 {
    if later < earlier {
        return -months_between(earlier, later);
    }
    let mut months =
        (later.year() - earlier.year()) * 12 + later.month() as i32 - earlier.month() as i32;
    if later.day() < earlier.day() {
        months -= 1;
    }
    months
}

/// Axis label, e.g. `Jan 24`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %y").to_string()
}

/// Long display form, e.g. `February 9, 2026`.
pub fn long_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
