// In-memory registry and dosing log, seeded from fixtures for the session
use crate::application::dosing_repository::DosingRepository;
use crate::application::registry_repository::RegistryRepository;
use crate::domain::dosing::DosingEvent;
use crate::domain::equipment::EquipmentItem;
use crate::domain::livestock::LivestockItem;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct InMemoryRegistry {
    equipment: RwLock<Vec<EquipmentItem>>,
    livestock: RwLock<Vec<LivestockItem>>,
    next_id: AtomicU64,
}

impl InMemoryRegistry {
    pub fn new(equipment: Vec<EquipmentItem>, livestock: Vec<LivestockItem>) -> Self {
        // Continue numbering after the highest numeric fixture id
        let highest = highest_numeric_id(
            equipment
                .iter()
                .map(|e| e.id.as_str())
                .chain(livestock.iter().map(|l| l.id.as_str())),
        );

        Self {
            equipment: RwLock::new(equipment),
            livestock: RwLock::new(livestock),
            next_id: AtomicU64::new(highest + 1),
        }
    }
}

#[async_trait]
impl RegistryRepository for InMemoryRegistry {
    async fn next_id(&self) -> Result<String> {
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed).to_string())
    }

    async fn list_equipment(&self) -> Result<Vec<EquipmentItem>> {
        Ok(self.equipment.read().await.clone())
    }

    async fn find_equipment(&self, id: &str) -> Result<Option<EquipmentItem>> {
        Ok(self.equipment.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_equipment(&self, item: EquipmentItem) -> Result<()> {
        tracing::debug!("Inserting equipment {}", item.id);
        self.equipment.write().await.push(item);
        Ok(())
    }

    async fn replace_equipment(&self, item: EquipmentItem) -> Result<bool> {
        let mut equipment = self.equipment.write().await;
        match equipment.iter_mut().find(|e| e.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_livestock(&self) -> Result<Vec<LivestockItem>> {
        Ok(self.livestock.read().await.clone())
    }

    async fn find_livestock(&self, id: &str) -> Result<Option<LivestockItem>> {
        Ok(self.livestock.read().await.iter().find(|l| l.id == id).cloned())
    }

    async fn insert_livestock(&self, item: LivestockItem) -> Result<()> {
        tracing::debug!("Inserting livestock {}", item.id);
        self.livestock.write().await.insert(0, item);
        Ok(())
    }

    async fn replace_livestock(&self, item: LivestockItem) -> Result<bool> {
        let mut livestock = self.livestock.write().await;
        match livestock.iter_mut().find(|l| l.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn highest_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0)
}

#[derive(Debug)]
pub struct InMemoryDosingLog {
    events: RwLock<Vec<DosingEvent>>,
    next_id: AtomicU64,
}

impl InMemoryDosingLog {
    pub fn new(events: Vec<DosingEvent>) -> Self {
        let highest = highest_numeric_id(events.iter().map(|e| e.id.as_str()));
        Self {
            events: RwLock::new(events),
            next_id: AtomicU64::new(highest + 1),
        }
    }
}

#[async_trait]
impl DosingRepository for InMemoryDosingLog {
    async fn next_id(&self) -> Result<String> {
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed).to_string())
    }

    async fn list_events(&self) -> Result<Vec<DosingEvent>> {
        Ok(self.events.read().await.clone())
    }

    async fn insert_event(&self, event: DosingEvent) -> Result<()> {
        tracing::debug!("Logging dose {} of {}", event.id, event.chemical);
        self.events.write().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::EquipmentStatus;
    use crate::domain::livestock::LivestockStatus;

    fn equipment(id: &str) -> EquipmentItem {
        EquipmentItem {
            id: id.to_string(),
            name: "Tunze Osmolator 3155".to_string(),
            model: "Tunze Osmolator 3155".to_string(),
            quantity: 1,
            status: EquipmentStatus::Active,
            categories: vec![],
            tags: vec![],
            added_date: "2023-06-20".to_string(),
            retired_date: None,
            section: "ATO".to_string(),
            deleted: false,
        }
    }

    fn livestock(id: &str) -> LivestockItem {
        LivestockItem {
            id: id.to_string(),
            common_name: "Yellow Tang".to_string(),
            scientific_name: "Zebrasoma flavescens".to_string(),
            category: "Tangs".to_string(),
            tags: vec![],
            status: LivestockStatus::Alive,
            acquisition_date: "2025-06-09".to_string(),
            status_transition_date: None,
            quantity: 1,
            vendor: "AAC".to_string(),
            tank_bred: false,
            price_paid: 55.0,
            currency: "GBP".to_string(),
            notes: String::new(),
            deleted: false,
        }
    }

    #[tokio::test]
    async fn test_ids_continue_after_fixtures() {
        let repo = InMemoryRegistry::new(vec![equipment("11")], vec![livestock("4"), livestock("abc")]);
        assert_eq!(repo.next_id().await.unwrap(), "12");
        assert_eq!(repo.next_id().await.unwrap(), "13");
    }

    #[tokio::test]
    async fn test_livestock_prepends_and_replaces() {
        let repo = InMemoryRegistry::new(vec![], vec![livestock("1")]);
        repo.insert_livestock(livestock("2")).await.unwrap();

        let ids: Vec<_> = repo.list_livestock().await.unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let mut updated = livestock("1");
        updated.notes = "Moved to DT".to_string();
        assert!(repo.replace_livestock(updated).await.unwrap());
        assert!(!repo.replace_livestock(livestock("99")).await.unwrap());

        let found = repo.find_livestock("1").await.unwrap().unwrap();
        assert_eq!(found.notes, "Moved to DT");
    }

    #[tokio::test]
    async fn test_equipment_appends_and_replaces() {
        let repo = InMemoryRegistry::new(vec![equipment("1")], vec![]);
        repo.insert_equipment(equipment("2")).await.unwrap();

        let ids: Vec<_> = repo.list_equipment().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let mut moved = equipment("2");
        moved.section = "Sump".to_string();
        assert!(repo.replace_equipment(moved).await.unwrap());
        assert_eq!(repo.find_equipment("2").await.unwrap().unwrap().section, "Sump");
        assert!(repo.find_equipment("3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dosing_log_appends_after_fixtures() {
        let dose = |id: &str| DosingEvent {
            id: id.to_string(),
            timestamp: "2026-02-08T22:05:10".to_string(),
            pump: "PUMP 1".to_string(),
            chemical: "Alkalinity".to_string(),
            chemical_sub: None,
            volume: 0.9,
            remaining: Some(1190.0),
            notes: String::new(),
        };
        let log = InMemoryDosingLog::new(vec![dose("7"), dose("2")]);
        let id = log.next_id().await.unwrap();
        assert_eq!(id, "8");
        log.insert_event(dose(&id)).await.unwrap();

        let ids: Vec<_> = log.list_events().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["7", "2", "8"]);
    }
}
