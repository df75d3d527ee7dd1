mod contact;
mod notification;
mod shared;

pub use contact::IContactRepo;
pub use notification::INotificationRepo;

use contact::{InMemoryContactRepo, PostgresContactRepo};
use notification::{InMemoryNotificationRepo, PostgresNotificationRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub contacts: Arc<dyn IContactRepo>,
    pub notifications: Arc<dyn INotificationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(connection_string)
            .await?;

        Ok(Self {
            contacts: Arc::new(PostgresContactRepo::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            contacts: Arc::new(InMemoryContactRepo::new()),
            notifications: Arc::new(InMemoryNotificationRepo::new()),
        }
    }
}
