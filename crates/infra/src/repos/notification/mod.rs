mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationRepo;
pub use postgres::PostgresNotificationRepo;

use sage_scheduler_domain::{DashboardNotification, ID};

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn insert(&self, notification: &DashboardNotification) -> anyhow::Result<()>;
    async fn find_unseen(&self) -> anyhow::Result<Vec<DashboardNotification>>;
    async fn find_by_contact(&self, contact_id: &ID) -> anyhow::Result<Vec<DashboardNotification>>;
    async fn mark_seen(&self, notification_id: &ID) -> anyhow::Result<()>;
}
