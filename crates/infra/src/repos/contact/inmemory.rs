use super::IContactRepo;
use crate::repos::shared::inmemory_repo::*;
use sage_scheduler_domain::{BookedSlot, Contact, TimeSpan, ID};

pub struct InMemoryContactRepo {
    contacts: std::sync::Mutex<Vec<Contact>>,
}

impl InMemoryContactRepo {
    pub fn new() -> Self {
        Self {
            contacts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryContactRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IContactRepo for InMemoryContactRepo {
    async fn insert(&self, contact: &Contact) -> anyhow::Result<()> {
        insert(contact, &self.contacts);
        Ok(())
    }

    async fn save(&self, contact: &Contact) -> anyhow::Result<()> {
        save(contact, &self.contacts);
        Ok(())
    }

    async fn find(&self, contact_id: &ID) -> Option<Contact> {
        find(contact_id, &self.contacts)
    }

    async fn find_by_cancel_token(&self, cancel_token: &str) -> Option<Contact> {
        let matches = find_by(&self.contacts, |contact: &Contact| {
            contact
                .appointment
                .as_ref()
                .map(|a| a.cancel_token == cancel_token)
                .unwrap_or(false)
        });
        matches.into_iter().next()
    }

    async fn find_awaiting_intake(&self) -> anyhow::Result<Vec<Contact>> {
        Ok(find_by(&self.contacts, |contact: &Contact| {
            !contact.reminders.intake_completed
                && contact.reminders.count < sage_scheduler_domain::MAX_REMINDER_COUNT
        }))
    }

    async fn booked_slots_in_range(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<BookedSlot>> {
        let contacts = find_by(&self.contacts, |contact: &Contact| {
            contact
                .active_appointment()
                .map(|a| timespan.contains(a.scheduled_at))
                .unwrap_or(false)
        });
        let mut slots = contacts
            .into_iter()
            .filter_map(|contact| {
                let appointment = contact.active_appointment()?;
                Some(BookedSlot {
                    start_ts: appointment.scheduled_at,
                    end_ts: appointment.end_ts(),
                    contact_id: contact.id.clone(),
                })
            })
            .collect::<Vec<_>>();
        slots.sort_by_key(|s| s.start_ts);
        Ok(slots)
    }

    async fn delete(&self, contact_id: &ID) -> Option<Contact> {
        delete(contact_id, &self.contacts)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sage_scheduler_domain::Appointment;

    #[tokio::test]
    async fn ledger_excludes_cancelled_appointments() {
        let repo = InMemoryContactRepo::new();

        let mut booked = Contact::new("Booked Lead".into(), "booked@example.com".into(), 0);
        booked.appointment = Some(Appointment::new(5000, 1000, 0));
        repo.insert(&booked).await.unwrap();

        let mut cancelled = Contact::new("Cancelled Lead".into(), "gone@example.com".into(), 0);
        let mut appointment = Appointment::new(7000, 1000, 0);
        appointment.cancel(10);
        cancelled.appointment = Some(appointment);
        repo.insert(&cancelled).await.unwrap();

        let slots = repo
            .booked_slots_in_range(&TimeSpan::new(0, 10_000))
            .await
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_ts, 5000);
        assert_eq!(slots[0].contact_id, booked.id);
    }

    #[tokio::test]
    async fn finds_contact_by_cancel_token() {
        let repo = InMemoryContactRepo::new();
        let mut contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), 0);
        let appointment = Appointment::new(5000, 1000, 0);
        let token = appointment.cancel_token.clone();
        contact.appointment = Some(appointment);
        repo.insert(&contact).await.unwrap();

        let found = repo.find_by_cancel_token(&token).await.unwrap();
        assert_eq!(found.id, contact.id);
        assert!(repo.find_by_cancel_token("other-token").await.is_none());
    }

    #[tokio::test]
    async fn save_updates_in_place() {
        let repo = InMemoryContactRepo::new();
        let mut contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), 0);
        repo.insert(&contact).await.unwrap();

        contact.status_label = "appointment scheduled".into();
        repo.save(&contact).await.unwrap();

        let found = repo.find(&contact.id).await.unwrap();
        assert_eq!(found.status_label, "appointment scheduled");
    }
}
