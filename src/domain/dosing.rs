// Dosing log and trace-element batch models
use super::calendar::parse_date;
use super::error::AnalysisError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pump name recorded for doses added by hand.
pub const MANUAL_PUMP: &str = "MANUAL";

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%b %d, %Y, %I:%M:%S %p",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingEvent {
    /// Assigned by the log; ignored on submission.
    #[serde(default)]
    pub id: String,
    /// ISO date-time, e.g. `2026-02-08T23:25:10`.
    pub timestamp: String,
    #[serde(default)]
    pub pump: String,
    pub chemical: String,
    #[serde(default)]
    pub chemical_sub: Option<String>,
    /// Millilitres dosed.
    pub volume: f64,
    /// Millilitres left in the container after the dose, if the pump tracks it.
    #[serde(default)]
    pub remaining: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl DosingEvent {
    pub fn is_manual(&self) -> bool {
        self.pump.eq_ignore_ascii_case(MANUAL_PUMP)
    }

    pub fn at(&self) -> Result<NaiveDateTime, AnalysisError> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, AnalysisError> {
    let trimmed = value.trim();
    let mut last_err = None;
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(at) => return Ok(at),
            Err(e) => last_err = Some(e),
        }
    }
    Err(AnalysisError::date_parse(
        value,
        last_err.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

/// Volume of one chemical over the trailing day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosingSummary {
    pub chemical: String,
    pub volume: f64,
    pub is_manual: bool,
}

/// One bar of the daily volume chart; volumes are keyed by chemical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyVolume {
    pub date: String,
    #[serde(flatten)]
    pub volumes: BTreeMap<String, f64>,
}

/// Round to one decimal place, the precision the pumps report.
pub fn round_ml(volume: f64) -> f64 {
    let rounded = (volume * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Sum per chemical of doses in the 24 hours up to and including `now`.
/// Pump chemicals come first, then manual ones, each alphabetically.
pub fn summarize_last_day(
    events: &[(NaiveDateTime, &DosingEvent)],
    now: NaiveDateTime,
) -> Vec<DosingSummary> {
    let since = now - Duration::hours(24);
    let mut totals: BTreeMap<(bool, &str), f64> = BTreeMap::new();
    for (at, event) in events {
        if *at > since && *at <= now {
            *totals
                .entry((event.is_manual(), event.chemical.as_str()))
                .or_default() += event.volume;
        }
    }
    totals
        .into_iter()
        .map(|((is_manual, chemical), volume)| DosingSummary {
            chemical: chemical.to_string(),
            volume: round_ml(volume),
            is_manual,
        })
        .collect()
}

/// One row per calendar day in `start..=end`, with every chemical seen in
/// `events` present on each row.
pub fn daily_volumes(
    events: &[(NaiveDateTime, &DosingEvent)],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyVolume> {
    let chemicals: BTreeMap<&str, f64> = events
        .iter()
        .map(|(_, e)| (e.chemical.as_str(), 0.0))
        .collect();

    let mut days: BTreeMap<NaiveDate, BTreeMap<&str, f64>> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, chemicals.clone()))
        .collect();

    for (at, event) in events {
        if let Some(day) = days.get_mut(&at.date()) {
            *day.entry(event.chemical.as_str()).or_default() += event.volume;
        }
    }

    days.into_iter()
        .map(|(date, volumes)| DailyVolume {
            date: date.format("%b %-d").to_string(),
            volumes: volumes
                .into_iter()
                .map(|(chemical, v)| (chemical.to_string(), round_ml(v)))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceElement {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub ml_per_day: f64,
}

/// A mixed trace-element batch, dosed across a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBatch {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub containers: u32,
    #[serde(default)]
    pub elements: Vec<TraceElement>,
    pub total_volume: f64,
}

impl TraceBatch {
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), AnalysisError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if end < start {
            return Err(AnalysisError::Validation(format!(
                "batch '{}' ends before it starts",
                self.id
            )));
        }
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceTemplate {
    pub id: String,
    pub name: String,
    pub containers: u32,
    pub days: u32,
    pub ml_per_day: f64,
    #[serde(default)]
    pub element_names: Vec<String>,
}
