// Repository trait for the dosing log
use crate::domain::dosing::DosingEvent;
use async_trait::async_trait;

#[async_trait]
pub trait DosingRepository: Send + Sync {
    async fn next_id(&self) -> anyhow::Result<String>;

    /// Every logged dose, in insertion order
    async fn list_events(&self) -> anyhow::Result<Vec<DosingEvent>>;

    async fn insert_event(&self, event: DosingEvent) -> anyhow::Result<()>;
}
