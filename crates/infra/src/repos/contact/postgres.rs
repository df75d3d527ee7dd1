use super::IContactRepo;
use sage_scheduler_domain::{
    Appointment, AppointmentStatus, BookedSlot, Contact, IntakeAnswer, ReminderState, TimeSpan, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresContactRepo {
    pool: PgPool,
}

impl PostgresContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ContactRaw {
    contact_uid: Uuid,
    full_name: String,
    email: String,
    phone: Option<String>,
    intake_answers: serde_json::Value,
    intake_completed: bool,
    reminder_count: i16,
    last_reminder_sent_at: Option<i64>,
    scheduled_at: Option<i64>,
    appointment_duration: Option<i64>,
    appointment_status: Option<String>,
    cancel_token: Option<String>,
    appointment_created: Option<i64>,
    appointment_updated: Option<i64>,
    notes: String,
    status_label: String,
    created: i64,
    updated: i64,
}

#[derive(Debug, FromRow)]
struct BookedSlotRaw {
    contact_uid: Uuid,
    start_ts: i64,
    end_ts: i64,
}

impl From<ContactRaw> for Contact {
    fn from(raw: ContactRaw) -> Self {
        let appointment = match (
            raw.scheduled_at,
            raw.appointment_duration,
            raw.appointment_status,
            raw.cancel_token,
        ) {
            (Some(scheduled_at), Some(duration), Some(status), Some(cancel_token)) => {
                Some(Appointment {
                    scheduled_at,
                    duration,
                    status: status
                        .parse::<AppointmentStatus>()
                        .unwrap_or(AppointmentStatus::Pending),
                    cancel_token,
                    created: raw.appointment_created.unwrap_or(raw.created),
                    updated: raw.appointment_updated.unwrap_or(raw.created),
                })
            }
            _ => None,
        };
        Self {
            id: raw.contact_uid.into(),
            full_name: raw.full_name,
            email: raw.email,
            phone: raw.phone,
            intake_answers: serde_json::from_value::<Vec<IntakeAnswer>>(raw.intake_answers)
                .unwrap_or_default(),
            appointment,
            reminders: ReminderState {
                count: raw.reminder_count as u8,
                last_sent_at: raw.last_reminder_sent_at,
                intake_completed: raw.intake_completed,
            },
            notes: raw.notes,
            status_label: raw.status_label,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

impl From<BookedSlotRaw> for BookedSlot {
    fn from(raw: BookedSlotRaw) -> Self {
        Self {
            start_ts: raw.start_ts,
            end_ts: raw.end_ts,
            contact_id: raw.contact_uid.into(),
        }
    }
}

const CONTACT_COLUMNS: &str = r#"
    contact_uid,
    full_name,
    email,
    phone,
    intake_answers,
    intake_completed,
    reminder_count,
    last_reminder_sent_at,
    scheduled_at,
    appointment_duration,
    appointment_status,
    cancel_token,
    appointment_created,
    appointment_updated,
    notes,
    status_label,
    created,
    updated
"#;

#[async_trait::async_trait]
impl IContactRepo for PostgresContactRepo {
    async fn insert(&self, contact: &Contact) -> anyhow::Result<()> {
        let intake_answers = serde_json::to_value(&contact.intake_answers)?;
        let appointment = contact.appointment.as_ref();
        sqlx::query(
            r#"
            INSERT INTO contacts(
                contact_uid,
                full_name,
                email,
                phone,
                intake_answers,
                intake_completed,
                reminder_count,
                last_reminder_sent_at,
                scheduled_at,
                appointment_duration,
                appointment_status,
                cancel_token,
                appointment_created,
                appointment_updated,
                notes,
                status_label,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(contact.id.inner_ref())
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(intake_answers)
        .bind(contact.reminders.intake_completed)
        .bind(contact.reminders.count as i16)
        .bind(contact.reminders.last_sent_at)
        .bind(appointment.map(|a| a.scheduled_at))
        .bind(appointment.map(|a| a.duration))
        .bind(appointment.map(|a| a.status.to_string()))
        .bind(appointment.map(|a| a.cancel_token.clone()))
        .bind(appointment.map(|a| a.created))
        .bind(appointment.map(|a| a.updated))
        .bind(&contact.notes)
        .bind(&contact.status_label)
        .bind(contact.created)
        .bind(contact.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, contact: &Contact) -> anyhow::Result<()> {
        let intake_answers = serde_json::to_value(&contact.intake_answers)?;
        let appointment = contact.appointment.as_ref();
        sqlx::query(
            r#"
            UPDATE contacts SET
                full_name = $2,
                email = $3,
                phone = $4,
                intake_answers = $5,
                intake_completed = $6,
                reminder_count = $7,
                last_reminder_sent_at = $8,
                scheduled_at = $9,
                appointment_duration = $10,
                appointment_status = $11,
                cancel_token = $12,
                appointment_created = $13,
                appointment_updated = $14,
                notes = $15,
                status_label = $16,
                updated = $17
            WHERE contact_uid = $1
            "#,
        )
        .bind(contact.id.inner_ref())
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(intake_answers)
        .bind(contact.reminders.intake_completed)
        .bind(contact.reminders.count as i16)
        .bind(contact.reminders.last_sent_at)
        .bind(appointment.map(|a| a.scheduled_at))
        .bind(appointment.map(|a| a.duration))
        .bind(appointment.map(|a| a.status.to_string()))
        .bind(appointment.map(|a| a.cancel_token.clone()))
        .bind(appointment.map(|a| a.created))
        .bind(appointment.map(|a| a.updated))
        .bind(&contact.notes)
        .bind(&contact.status_label)
        .bind(contact.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, contact_id: &ID) -> Option<Contact> {
        let query = format!(
            "SELECT {} FROM contacts WHERE contact_uid = $1",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, ContactRaw>(&query)
            .bind(contact_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|raw| raw.into())
    }

    async fn find_by_cancel_token(&self, cancel_token: &str) -> Option<Contact> {
        let query = format!(
            "SELECT {} FROM contacts WHERE cancel_token = $1",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, ContactRaw>(&query)
            .bind(cancel_token)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|raw| raw.into())
    }

    async fn find_awaiting_intake(&self) -> anyhow::Result<Vec<Contact>> {
        let query = format!(
            "SELECT {} FROM contacts WHERE intake_completed = FALSE AND reminder_count < $1 ORDER BY created",
            CONTACT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ContactRaw>(&query)
            .bind(sage_scheduler_domain::MAX_REMINDER_COUNT as i16)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }

    async fn booked_slots_in_range(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<BookedSlot>> {
        let rows = sqlx::query_as::<_, BookedSlotRaw>(
            r#"
            SELECT
                contact_uid,
                scheduled_at AS start_ts,
                scheduled_at + appointment_duration AS end_ts
            FROM contacts
            WHERE scheduled_at IS NOT NULL
              AND appointment_status != 'cancelled'
              AND scheduled_at >= $1
              AND scheduled_at <= $2
            ORDER BY scheduled_at
            "#,
        )
        .bind(timespan.start())
        .bind(timespan.end())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }

    async fn delete(&self, contact_id: &ID) -> Option<Contact> {
        let query = format!(
            "DELETE FROM contacts WHERE contact_uid = $1 RETURNING {}",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, ContactRaw>(&query)
            .bind(contact_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|raw| raw.into())
    }
}
