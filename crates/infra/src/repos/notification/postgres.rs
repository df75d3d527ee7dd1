use super::INotificationRepo;
use sage_scheduler_domain::{DashboardNotification, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRaw {
    notification_uid: Uuid,
    contact_uid: Uuid,
    message: String,
    seen: bool,
    created: i64,
}

impl From<NotificationRaw> for DashboardNotification {
    fn from(raw: NotificationRaw) -> Self {
        Self {
            id: raw.notification_uid.into(),
            contact_id: raw.contact_uid.into(),
            message: raw.message,
            seen: raw.seen,
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl INotificationRepo for PostgresNotificationRepo {
    async fn insert(&self, notification: &DashboardNotification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dashboard_notifications(
                notification_uid,
                contact_uid,
                message,
                seen,
                created
            )
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id.inner_ref())
        .bind(notification.contact_id.inner_ref())
        .bind(&notification.message)
        .bind(notification.seen)
        .bind(notification.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_unseen(&self) -> anyhow::Result<Vec<DashboardNotification>> {
        let rows = sqlx::query_as::<_, NotificationRaw>(
            "SELECT notification_uid, contact_uid, message, seen, created
             FROM dashboard_notifications WHERE seen = FALSE ORDER BY created DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }

    async fn find_by_contact(&self, contact_id: &ID) -> anyhow::Result<Vec<DashboardNotification>> {
        let rows = sqlx::query_as::<_, NotificationRaw>(
            "SELECT notification_uid, contact_uid, message, seen, created
             FROM dashboard_notifications WHERE contact_uid = $1 ORDER BY created DESC",
        )
        .bind(contact_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }

    async fn mark_seen(&self, notification_id: &ID) -> anyhow::Result<()> {
        sqlx::query("UPDATE dashboard_notifications SET seen = TRUE WHERE notification_uid = $1")
            .bind(notification_id.inner_ref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
