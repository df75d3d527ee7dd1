use super::INotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use sage_scheduler_domain::{DashboardNotification, ID};

pub struct InMemoryNotificationRepo {
    notifications: std::sync::Mutex<Vec<DashboardNotification>>,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn insert(&self, notification: &DashboardNotification) -> anyhow::Result<()> {
        insert(notification, &self.notifications);
        Ok(())
    }

    async fn find_unseen(&self) -> anyhow::Result<Vec<DashboardNotification>> {
        Ok(find_by(&self.notifications, |n: &DashboardNotification| {
            !n.seen
        }))
    }

    async fn find_by_contact(&self, contact_id: &ID) -> anyhow::Result<Vec<DashboardNotification>> {
        Ok(find_by(&self.notifications, |n: &DashboardNotification| {
            n.contact_id == *contact_id
        }))
    }

    async fn mark_seen(&self, notification_id: &ID) -> anyhow::Result<()> {
        let mut notifications = self.notifications.lock().unwrap();
        for notification in notifications.iter_mut() {
            if notification.id == *notification_id {
                notification.seen = true;
            }
        }
        Ok(())
    }
}
