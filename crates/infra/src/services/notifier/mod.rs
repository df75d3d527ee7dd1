mod inmemory;
mod webhook;

pub use inmemory::InMemoryNotifier;
pub use webhook::WebhookNotifier;

use serde::Serialize;
use tracing::info;

/// Calendar-event metadata carried only on admin-facing notifications, so the
/// office calendar gets a full event while the client's confirmation stays a
/// plain message and does not spawn a duplicate calendar entry on their side.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventFields {
    pub title: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub attendee: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ReminderChannel {
    Email,
    Sms,
}

/// The payloads handed to the delivery relay. Delivery mechanics (SMTP, SMS
/// gateway, retries) are the relay's problem, not ours.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationPayload {
    ClientConfirmation {
        to: String,
        subject: String,
        body: String,
    },
    AdminCalendarEvent {
        to: String,
        subject: String,
        body: String,
        event: CalendarEventFields,
    },
    IntakeReminder {
        to: String,
        channel: ReminderChannel,
        subject: String,
        body: String,
    },
}

impl NotificationPayload {
    pub fn recipient(&self) -> &str {
        match self {
            Self::ClientConfirmation { to, .. } => to,
            Self::AdminCalendarEvent { to, .. } => to,
            Self::IntakeReminder { to, .. } => to,
        }
    }
}

/// Fire-and-forget delivery. `false` means the relay rejected the payload or
/// the request failed; callers decide whether that matters.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> bool;
}

/// Fallback notifier used when no relay is configured: logs the payload and
/// reports success.
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn send(&self, payload: &NotificationPayload) -> bool {
        info!("Notification for {}: {:?}", payload.recipient(), payload);
        true
    }
}
