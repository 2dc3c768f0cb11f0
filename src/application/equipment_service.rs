// Equipment service - Inventory use cases and the section timeline
use crate::application::registry_repository::RegistryRepository;
use crate::application::timeline_layout::layout_sections;
use crate::domain::calendar::parse_date;
use crate::domain::equipment::{ordered_sections, EquipmentFilter, EquipmentItem, EquipmentStatus};
use crate::domain::error::AnalysisError;
use crate::domain::timeline::{TimelineEntry, TimelineLayout};
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Clone)]
pub struct EquipmentService {
    repository: Arc<dyn RegistryRepository>,
}

impl EquipmentService {
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filter: EquipmentFilter) -> anyhow::Result<Vec<EquipmentItem>> {
        let items = self.repository.list_equipment().await?;
        Ok(items
            .into_iter()
            .filter(|e| !e.deleted && filter.matches(e))
            .collect())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<EquipmentItem> {
        match self.repository.find_equipment(id).await? {
            Some(item) if !item.deleted => Ok(item),
            _ => Err(AnalysisError::not_found("equipment", id).into()),
        }
    }

    pub async fn create(&self, mut item: EquipmentItem) -> anyhow::Result<EquipmentItem> {
        validate(&item)?;
        item.id = self.repository.next_id().await?;
        item.deleted = false;
        tracing::info!("Adding equipment {} ({})", item.id, item.name);
        self.repository.insert_equipment(item.clone()).await?;
        Ok(item)
    }

    pub async fn update(&self, id: &str, mut item: EquipmentItem) -> anyhow::Result<EquipmentItem> {
        self.get(id).await?;
        validate(&item)?;
        item.id = id.to_string();
        item.deleted = false;
        self.store(item).await
    }

    pub async fn retire(&self, id: &str, on: NaiveDate) -> anyhow::Result<EquipmentItem> {
        let mut item = self.get(id).await?;
        if on < parse_date(&item.added_date)? {
            return Err(AnalysisError::Validation(format!(
                "retired date {} precedes added date {}",
                on, item.added_date
            ))
            .into());
        }
        item.status = EquipmentStatus::Retired;
        item.retired_date = Some(on.format("%Y-%m-%d").to_string());
        tracing::info!("Retiring equipment {} on {}", id, on);
        self.store(item).await
    }

    /// Hide a record from every listing for the rest of the session.
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let mut item = self.get(id).await?;
        item.deleted = true;
        tracing::info!("Removing equipment {}", id);
        self.store(item).await.map(|_| ())
    }

    pub async fn timeline(
        &self,
        filter: EquipmentFilter,
        now: NaiveDate,
    ) -> anyhow::Result<TimelineLayout> {
        let items = self.list(filter).await?;
        let entries: Vec<TimelineEntry> = items.iter().map(EquipmentItem::to_timeline_entry).collect();
        let timeline = layout_sections(&entries, &ordered_sections(&items), now);
        if timeline.is_empty() {
            tracing::debug!("Equipment timeline has nothing to draw");
        } else {
            tracing::debug!(
                "Equipment timeline: {} bars across {} months",
                timeline.bars().count(),
                timeline.total_months
            );
        }
        Ok(timeline)
    }

    async fn store(&self, item: EquipmentItem) -> anyhow::Result<EquipmentItem> {
        if !self.repository.replace_equipment(item.clone()).await? {
            return Err(AnalysisError::not_found("equipment", &item.id).into());
        }
        Ok(item)
    }
}

fn validate(item: &EquipmentItem) -> Result<(), AnalysisError> {
    if item.name.trim().is_empty() {
        return Err(AnalysisError::Validation("equipment name is required".to_string()));
    }
    if item.quantity == 0 {
        return Err(AnalysisError::Validation("quantity must be at least 1".to_string()));
    }
    let added = parse_date(&item.added_date)?;
    if let Some(retired) = item.retired_date.as_deref() {
        if parse_date(retired)? < added {
            return Err(AnalysisError::Validation(format!(
                "retired date {} precedes added date {}",
                retired, item.added_date
            )));
        }
    }
    Ok(())
}
