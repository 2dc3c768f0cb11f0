// Gantt-style lifecycle timeline models
use super::error::ItemFailure;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStatus {
    Active,
    Ended,
}

/// An interval-lifetime record: open-ended when `end` is `None`.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub id: String,
    pub name: String,
    /// ISO start date (added / acquired).
    pub start: String,
    /// ISO end date (retired / status transition).
    pub end: Option<String>,
    pub section: Option<String>,
    pub status: TimelineStatus,
    pub quantity: u32,
}

impl TimelineEntry {
    pub fn new(id: &str, name: &str, start: &str, end: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            start: start.to_string(),
            end: end.map(str::to_string),
            section: None,
            status: if end.is_some() {
                TimelineStatus::Ended
            } else {
                TimelineStatus::Active
            },
            quantity: 1,
        }
    }

    pub fn in_section(mut self, section: &str) -> Self {
        self.section = Some(section.to_string());
        self
    }

    pub fn with_status(mut self, status: TimelineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLabel {
    pub label: String,
    /// ISO date of the first day of the month.
    pub start: String,
}

/// Bar position and width as fractions of the full axis width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub id: String,
    pub name: String,
    pub status: TimelineStatus,
    pub quantity: u32,
    pub offset_months: u32,
    pub duration_months: u32,
    pub left: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineSection {
    pub section: Option<String>,
    pub bars: Vec<BarGeometry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineLayout {
    pub axis: Vec<MonthLabel>,
    pub total_months: u32,
    pub sections: Vec<TimelineSection>,
    pub failures: Vec<ItemFailure>,
}

impl TimelineLayout {
    pub fn is_empty(&self) -> bool {
        self.bars().next().is_none()
    }

    /// All bars across sections, in section order.
    pub fn bars(&self) -> impl Iterator<Item = &BarGeometry> {
        self.sections.iter().flat_map(|s| s.bars.iter())
    }
}
