// Repository trait for the equipment and livestock registries
use crate::domain::equipment::EquipmentItem;
use crate::domain::livestock::LivestockItem;
use async_trait::async_trait;

#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// Allocate an id for a newly created record
    async fn next_id(&self) -> anyhow::Result<String>;

    /// All equipment, including soft-deleted records
    async fn list_equipment(&self) -> anyhow::Result<Vec<EquipmentItem>>;

    async fn find_equipment(&self, id: &str) -> anyhow::Result<Option<EquipmentItem>>;

    /// Append a new equipment record
    async fn insert_equipment(&self, item: EquipmentItem) -> anyhow::Result<()>;

    /// Replace the record with the same id; returns false if none exists
    async fn replace_equipment(&self, item: EquipmentItem) -> anyhow::Result<bool>;

    /// All livestock, newest additions first, including soft-deleted records
    async fn list_livestock(&self) -> anyhow::Result<Vec<LivestockItem>>;

    async fn find_livestock(&self, id: &str) -> anyhow::Result<Option<LivestockItem>>;

    /// Prepend a new livestock record
    async fn insert_livestock(&self, item: LivestockItem) -> anyhow::Result<()>;

    /// Replace the record with the same id; returns false if none exists
    async fn replace_livestock(&self, item: LivestockItem) -> anyhow::Result<bool>;
}
