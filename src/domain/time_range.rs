// Analysis time windows
use super::calendar::long_label;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7D")]
    Week,
    #[default]
    #[serde(rename = "30D")]
    Month,
    #[serde(rename = "90D")]
    Quarter,
    #[serde(rename = "1Y")]
    Year,
}

impl TimeRange {
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }

    pub fn window(&self, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        (end - Duration::days(self.days()), end)
    }

    /// e.g. `January 10, 2026 – February 9, 2026`
    pub fn label(&self, end: NaiveDate) -> String {
        let (start, end) = self.window(end);
        format!("{} – {}", long_label(start), long_label(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_and_label() {
        let end = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        assert_eq!(
            TimeRange::Month.label(end),
            "January 10, 2026 – February 9, 2026"
        );
        assert_eq!(
            TimeRange::Week.window(end).0,
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
        );
        assert_eq!(TimeRange::Year.days(), 365);

        let parsed: TimeRange = serde_json::from_str(r#""90D""#).unwrap();
        assert_eq!(parsed, TimeRange::Quarter);
    }
}
