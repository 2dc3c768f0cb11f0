// Livestock service - Registry use cases and the acquisition timeline
use crate::application::registry_repository::RegistryRepository;
use crate::application::timeline_layout::layout;
use crate::domain::calendar::parse_date;
use crate::domain::error::AnalysisError;
use crate::domain::livestock::{
    describe_age, stocking_count, LivestockFilter, LivestockItem, LivestockStatus,
    LivestockStatusFilter,
};
use crate::domain::timeline::{TimelineEntry, TimelineLayout};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct LivestockView {
    #[serde(flatten)]
    pub item: LivestockItem,
    /// Humanised time since acquisition; `None` if the date is unusable.
    pub age: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LivestockListing {
    pub items: Vec<LivestockView>,
    /// Living fish across the whole registry, regardless of the filter.
    pub stocking_count: u32,
}

#[derive(Clone)]
pub struct LivestockService {
    repository: Arc<dyn RegistryRepository>,
}

impl LivestockService {
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        filter: &LivestockFilter,
        today: NaiveDate,
    ) -> anyhow::Result<LivestockListing> {
        let items: Vec<LivestockItem> = self
            .repository
            .list_livestock()
            .await?
            .into_iter()
            .filter(|l| !l.deleted)
            .collect();
        let count = stocking_count(&items);

        let views = items
            .into_iter()
            .filter(|l| filter.matches(l))
            .map(|item| {
                let age = parse_date(&item.acquisition_date)
                    .ok()
                    .map(|acquired| describe_age(acquired, today));
                LivestockView { item, age }
            })
            .collect();

        Ok(LivestockListing {
            items: views,
            stocking_count: count,
        })
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<LivestockItem> {
        match self.repository.find_livestock(id).await? {
            Some(item) if !item.deleted => Ok(item),
            _ => Err(AnalysisError::not_found("livestock", id).into()),
        }
    }

    pub async fn create(&self, mut item: LivestockItem) -> anyhow::Result<LivestockItem> {
        validate(&item)?;
        item.id = self.repository.next_id().await?;
        item.deleted = false;
        if item.tags.is_empty() && !item.category.is_empty() {
            item.tags = vec![item.category.to_uppercase()];
        }
        tracing::info!("Adding livestock {} ({})", item.id, item.common_name);
        self.repository.insert_livestock(item.clone()).await?;
        Ok(item)
    }

    pub async fn update(&self, id: &str, mut item: LivestockItem) -> anyhow::Result<LivestockItem> {
        self.get(id).await?;
        validate(&item)?;
        item.id = id.to_string();
        item.deleted = false;
        self.store(item).await
    }

    pub async fn mark_deceased(&self, id: &str, on: NaiveDate) -> anyhow::Result<LivestockItem> {
        let mut item = self.get(id).await?;
        if on < parse_date(&item.acquisition_date)? {
            return Err(AnalysisError::Validation(format!(
                "status date {} precedes acquisition date {}",
                on, item.acquisition_date
            ))
            .into());
        }
        item.status = LivestockStatus::Deceased;
        item.status_transition_date = Some(on.format("%Y-%m-%d").to_string());
        tracing::info!("Marking livestock {} deceased on {}", id, on);
        self.store(item).await
    }

    /// Hide a record from every listing for the rest of the session.
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let mut item = self.get(id).await?;
        item.deleted = true;
        tracing::info!("Removing livestock {}", id);
        self.store(item).await.map(|_| ())
    }

    pub async fn timeline(
        &self,
        filter: &LivestockFilter,
        now: NaiveDate,
    ) -> anyhow::Result<TimelineLayout> {
        let entries: Vec<TimelineEntry> = self
            .repository
            .list_livestock()
            .await?
            .iter()
            .filter(|l| !l.deleted && filter.matches(l))
            .map(LivestockItem::to_timeline_entry)
            .collect();
        let timeline = layout(&entries, now);
        if timeline.is_empty() {
            tracing::debug!("Livestock timeline has nothing to draw");
        } else {
            tracing::debug!(
                "Livestock timeline: {} bars across {} months",
                timeline.bars().count(),
                timeline.total_months
            );
        }
        Ok(timeline)
    }

    async fn store(&self, item: LivestockItem) -> anyhow::Result<LivestockItem> {
        if !self.repository.replace_livestock(item.clone()).await? {
            return Err(AnalysisError::not_found("livestock", &item.id).into());
        }
        Ok(item)
    }
}

fn validate(item: &LivestockItem) -> Result<(), AnalysisError> {
    if item.common_name.trim().is_empty() {
        return Err(AnalysisError::Validation("common name is required".to_string()));
    }
    if item.quantity == 0 {
        return Err(AnalysisError::Validation("quantity must be at least 1".to_string()));
    }
    let acquired = parse_date(&item.acquisition_date)?;
    if let Some(changed) = item.status_transition_date.as_deref() {
        if parse_date(changed)? < acquired {
            return Err(AnalysisError::Validation(format!(
                "status date {} precedes acquisition date {}",
                changed, item.acquisition_date
            )));
        }
    }
    Ok(())
}
