mod inmemory;
mod postgres;

pub use inmemory::InMemoryContactRepo;
pub use postgres::PostgresContactRepo;

use sage_scheduler_domain::{BookedSlot, Contact, TimeSpan, ID};

#[async_trait::async_trait]
pub trait IContactRepo: Send + Sync {
    async fn insert(&self, contact: &Contact) -> anyhow::Result<()>;
    async fn save(&self, contact: &Contact) -> anyhow::Result<()>;
    async fn find(&self, contact_id: &ID) -> Option<Contact>;
    async fn find_by_cancel_token(&self, cancel_token: &str) -> Option<Contact>;
    /// Contacts that have not completed intake and are still inside the
    /// reminder escalation.
    async fn find_awaiting_intake(&self) -> anyhow::Result<Vec<Contact>>;
    /// The booking ledger: start/end/owner of every non-cancelled appointment
    /// whose start falls inside `timespan`.
    async fn booked_slots_in_range(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<BookedSlot>>;
    async fn delete(&self, contact_id: &ID) -> Option<Contact>;
}
