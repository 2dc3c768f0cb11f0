// Annotated events overlaid on time-series charts
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventIcon {
    Sparkles,
    Calendar,
    Droplets,
    Wrench,
}

impl EventIcon {
    /// Icon glyph name as understood by the dashboard's icon set.
    pub fn glyph(&self) -> &'static str {
        match self {
            EventIcon::Sparkles => "sparkles",
            EventIcon::Calendar => "calendar-days",
            EventIcon::Droplets => "droplets",
            EventIcon::Wrench => "wrench",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    pub id: String,
    pub name: String,
    /// Display date, e.g. `Feb 2, 2026`.
    pub date: String,
    pub icon: EventIcon,
}

impl EventItem {
    pub fn new(id: &str, name: &str, date: &str, icon: EventIcon) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            date: date.to_string(),
            icon,
        }
    }
}
