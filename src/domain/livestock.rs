// Livestock registry domain model
use super::timeline::{TimelineEntry, TimelineStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivestockStatus {
    Alive,
    Deceased,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestockItem {
    #[serde(default)]
    pub id: String,
    pub common_name: String,
    #[serde(default)]
    pub scientific_name: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: LivestockStatus,
    /// ISO date
    pub acquisition_date: String,
    /// ISO date the status last changed (e.g. when marked deceased).
    #[serde(default)]
    pub status_transition_date: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub tank_bred: bool,
    #[serde(default)]
    pub price_paid: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing)]
    pub deleted: bool,
}

fn default_quantity() -> u32 {
    1
}

/// Status filter used by the livestock views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LivestockStatusFilter {
    #[default]
    #[serde(rename = "all", alias = "All")]
    All,
    #[serde(alias = "alive")]
    Alive,
    #[serde(alias = "deceased")]
    Deceased,
}

impl LivestockStatusFilter {
    pub fn matches(&self, status: LivestockStatus) -> bool {
        match self {
            LivestockStatusFilter::All => true,
            LivestockStatusFilter::Alive => status == LivestockStatus::Alive,
            LivestockStatusFilter::Deceased => status == LivestockStatus::Deceased,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LivestockFilter {
    #[serde(default)]
    pub status: LivestockStatusFilter,
    pub search: Option<String>,
}

impl LivestockFilter {
    pub fn matches(&self, item: &LivestockItem) -> bool {
        if !self.status.matches(item.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => item
                .common_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

impl LivestockItem {
    pub fn to_timeline_entry(&self) -> TimelineEntry {
        let status = match self.status {
            LivestockStatus::Alive => TimelineStatus::Active,
            LivestockStatus::Deceased => TimelineStatus::Ended,
        };
        TimelineEntry::new(
            &self.id,
            &self.common_name,
            &self.acquisition_date,
            self.status_transition_date.as_deref(),
        )
        .with_status(status)
        .with_quantity(self.quantity)
    }
}

/// Number of living fish, counting quantities.
pub fn stocking_count(items: &[LivestockItem]) -> u32 {
    items
        .iter()
        .filter(|i| !i.deleted && i.status == LivestockStatus::Alive)
        .map(|i| i.quantity)
        .sum()
}

/// Humanised time since acquisition, e.g. `3 weeks`.
pub fn describe_age(acquired: NaiveDate, today: NaiveDate) -> String {
    let days = (today - acquired).num_days();
    if days < 1 {
        return "today".to_string();
    }
    if days == 1 {
        return "1 day".to_string();
    }
    if days < 7 {
        return format!("{} days", days);
    }
    if days < 30 {
        return plural(days / 7, "week");
    }
    if days < 365 {
        return plural(days / 30, "month");
    }
    plural(days / 365, "year")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fish(name: &str, status: LivestockStatus, quantity: u32) -> LivestockItem {
        LivestockItem {
            id: name.to_string(),
            common_name: name.to_string(),
            scientific_name: String::new(),
            category: "Anthias".to_string(),
            tags: vec![],
            status,
            acquisition_date: "2025-12-09".to_string(),
            status_transition_date: None,
            quantity,
            vendor: "AAC".to_string(),
            tank_bred: false,
            price_paid: 18.0,
            currency: "GBP".to_string(),
            notes: String::new(),
            deleted: false,
        }
    }

    #[test]
    fn test_describe_age() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let ago = |days: i64| today - chrono::Duration::days(days);
        assert_eq!(describe_age(today, today), "today");
        assert_eq!(describe_age(ago(1), today), "1 day");
        assert_eq!(describe_age(ago(6), today), "6 days");
        assert_eq!(describe_age(ago(7), today), "1 week");
        assert_eq!(describe_age(ago(20), today), "2 weeks");
        assert_eq!(describe_age(ago(45), today), "1 month");
        assert_eq!(describe_age(ago(300), today), "10 months");
        assert_eq!(describe_age(ago(400), today), "1 year");
        assert_eq!(describe_age(ago(800), today), "2 years");
    }

    #[test]
    fn test_filter_and_count() {
        let items = vec![
            fish("Resplendent Anthias", LivestockStatus::Alive, 4),
            fish("Yellow Tang", LivestockStatus::Alive, 1),
            fish("Diamond Watchman Goby", LivestockStatus::Deceased, 1),
        ];
        assert_eq!(stocking_count(&items), 5);

        let filter = LivestockFilter {
            status: LivestockStatusFilter::Alive,
            search: Some("TANG".to_string()),
        };
        let matched: Vec<_> = items.iter().filter(|i| filter.matches(i)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].common_name, "Yellow Tang");

        let all = LivestockFilter::default();
        assert!(items.iter().all(|i| all.matches(i)));

        let deceased = LivestockFilter {
            status: LivestockStatusFilter::Deceased,
            search: None,
        };
        assert_eq!(items.iter().filter(|i| deceased.matches(i)).count(), 1);
    }

    #[test]
    fn test_status_filter_accepts_all_spellings() {
        for (raw, expected) in [
            ("\"all\"", LivestockStatusFilter::All),
            ("\"All\"", LivestockStatusFilter::All),
            ("\"Alive\"", LivestockStatusFilter::Alive),
            ("\"deceased\"", LivestockStatusFilter::Deceased),
        ] {
            let filter: LivestockStatusFilter = serde_json::from_str(raw).unwrap();
            assert_eq!(filter, expected);
        }
    }

    #[test]
    fn test_timeline_entry_uses_transition_date() {
        let mut gone = fish("Goby", LivestockStatus::Deceased, 1);
        gone.status_transition_date = Some("2026-02-01".to_string());
        let entry = gone.to_timeline_entry();
        assert_eq!(entry.start, "2025-12-09");
        assert_eq!(entry.end.as_deref(), Some("2026-02-01"));
        assert_eq!(entry.status, TimelineStatus::Ended);
        assert!(entry.section.is_none());
    }
}
