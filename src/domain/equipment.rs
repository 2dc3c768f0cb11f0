// Equipment inventory domain model
use super::timeline::{TimelineEntry, TimelineStatus};
use serde::{Deserialize, Serialize};

/// Physical locations, in display order.
pub const SECTIONS: [&str; 3] = ["Display Tank", "Sump", "ATO"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Active,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCategory {
    Lighting,
    Circulation,
    Control,
    Other,
    Filtration,
    Dosing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentTag {
    MainLight,
    Wavemaker,
    Controller,
    AutomatedTesting,
    Doser,
    Heater,
    Skimmer,
    Reactor,
    Uv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub status: EquipmentStatus,
    #[serde(default)]
    pub categories: Vec<EquipmentCategory>,
    #[serde(default)]
    pub tags: Vec<EquipmentTag>,
    /// ISO date
    pub added_date: String,
    /// ISO date
    #[serde(default)]
    pub retired_date: Option<String>,
    pub section: String,
    #[serde(default, skip_serializing)]
    pub deleted: bool,
}

fn default_quantity() -> u32 {
    1
}

/// Status filter used by the inventory views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentFilter {
    #[default]
    Active,
    Retired,
    All,
}

impl EquipmentFilter {
    pub fn matches(&self, item: &EquipmentItem) -> bool {
        match self {
            EquipmentFilter::Active => item.status == EquipmentStatus::Active,
            EquipmentFilter::Retired => item.status == EquipmentStatus::Retired,
            EquipmentFilter::All => true,
        }
    }
}

impl EquipmentItem {
    pub fn to_timeline_entry(&self) -> TimelineEntry {
        let status = match self.status {
            EquipmentStatus::Active => TimelineStatus::Active,
            EquipmentStatus::Retired => TimelineStatus::Ended,
        };
        TimelineEntry::new(
            &self.id,
            &self.name,
            &self.added_date,
            self.retired_date.as_deref(),
        )
        .in_section(&self.section)
        .with_status(status)
        .with_quantity(self.quantity)
    }
}

/// Ordered section names for a set of items: the known sections first, then
/// any others in first-seen order.
pub fn ordered_sections(items: &[EquipmentItem]) -> Vec<String> {
    let mut sections: Vec<String> = SECTIONS.iter().map(|s| s.to_string()).collect();
    for item in items {
        if !sections.contains(&item.section) {
            sections.push(item.section.clone());
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, section: &str, status: EquipmentStatus) -> EquipmentItem {
        EquipmentItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            model: String::new(),
            quantity: 1,
            status,
            categories: vec![EquipmentCategory::Control, EquipmentCategory::Dosing],
            tags: vec![EquipmentTag::Doser],
            added_date: "2024-06-01".to_string(),
            retired_date: None,
            section: section.to_string(),
            deleted: false,
        }
    }

    #[test]
    fn test_filter_and_sections() {
        let items = vec![
            item("1", "Sump", EquipmentStatus::Active),
            item("2", "Frag Tank", EquipmentStatus::Retired),
        ];
        assert!(EquipmentFilter::Active.matches(&items[0]));
        assert!(!EquipmentFilter::Active.matches(&items[1]));
        assert!(EquipmentFilter::Retired.matches(&items[1]));
        assert!(EquipmentFilter::All.matches(&items[1]));

        assert_eq!(
            ordered_sections(&items),
            vec!["Display Tank", "Sump", "ATO", "Frag Tank"]
        );
    }

    #[test]
    fn test_tag_serde() {
        let json = serde_json::to_string(&vec![EquipmentTag::AutomatedTesting, EquipmentTag::Uv]).unwrap();
        assert_eq!(json, r#"["AUTOMATED_TESTING","UV"]"#);
    }

    #[test]
    fn test_timeline_entry_mapping() {
        let mut retired = item("9", "Sump", EquipmentStatus::Retired);
        retired.retired_date = Some("2025-01-15".to_string());
        retired.quantity = 2;
        let entry = retired.to_timeline_entry();
        assert_eq!(entry.end.as_deref(), Some("2025-01-15"));
        assert_eq!(entry.section.as_deref(), Some("Sump"));
        assert_eq!(entry.status, TimelineStatus::Ended);
        assert_eq!(entry.quantity, 2);
    }
}
