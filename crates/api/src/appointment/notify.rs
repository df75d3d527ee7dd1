use sage_scheduler_domain::{Appointment, Contact};
use sage_scheduler_infra::{CalendarEventFields, NotificationPayload, SageContext};

#[derive(Debug, Clone, Copy)]
pub enum BookingAction {
    Booked,
    Rescheduled,
    Cancelled,
}

impl BookingAction {
    fn client_subject(&self) -> &'static str {
        match self {
            Self::Booked => "Your appointment is confirmed",
            Self::Rescheduled => "Your appointment has been moved",
            Self::Cancelled => "Your appointment has been cancelled",
        }
    }

    fn admin_label(&self) -> &'static str {
        match self {
            Self::Booked => "New appointment",
            Self::Rescheduled => "Rescheduled appointment",
            Self::Cancelled => "Cancelled appointment",
        }
    }
}

/// Client-facing confirmation. Deliberately a plain message without
/// calendar-event fields, so booking clients do not end up with duplicate
/// calendar entries next to the invite their own mail client may create.
pub fn client_confirmation(
    contact: &Contact,
    slot_label: &str,
    action: BookingAction,
) -> NotificationPayload {
    let body = match action {
        BookingAction::Booked => format!(
            "Hi {}, your appointment is confirmed for {}. Use the link in this email if you need to reschedule or cancel.",
            contact.first_name(),
            slot_label
        ),
        BookingAction::Rescheduled => format!(
            "Hi {}, your appointment has been moved to {}.",
            contact.first_name(),
            slot_label
        ),
        BookingAction::Cancelled => format!(
            "Hi {}, your appointment on {} has been cancelled. You can book a new time whenever you are ready.",
            contact.first_name(),
            slot_label
        ),
    };
    NotificationPayload::ClientConfirmation {
        to: contact.email.clone(),
        subject: action.client_subject().into(),
        body,
    }
}

/// Admin-facing message carrying the full calendar-event fields so the office
/// calendar can be updated from it.
pub fn admin_calendar_event(
    contact: &Contact,
    appointment: &Appointment,
    slot_label: &str,
    action: BookingAction,
    ctx: &SageContext,
) -> NotificationPayload {
    NotificationPayload::AdminCalendarEvent {
        to: ctx.config.admin_email.clone(),
        subject: format!("{}: {} on {}", action.admin_label(), contact.full_name, slot_label),
        body: format!(
            "{} for {} ({}) on {}.",
            action.admin_label(),
            contact.full_name,
            contact.email,
            slot_label
        ),
        event: CalendarEventFields {
            title: format!("Session with {}", contact.full_name),
            description: format!(
                "{} ({})\n\n{}",
                contact.full_name,
                contact.email,
                intake_summary(contact)
            ),
            start_ts: appointment.scheduled_at,
            end_ts: appointment.end_ts(),
            attendee: contact.email.clone(),
            location: ctx.config.practice_location.clone(),
        },
    }
}

fn intake_summary(contact: &Contact) -> String {
    if contact.intake_answers.is_empty() {
        return "Intake form not completed yet.".into();
    }
    contact
        .intake_answers
        .iter()
        .map(|answer| format!("{}: {}", answer.question, answer.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use sage_scheduler_domain::IntakeAnswer;
    use sage_scheduler_infra::SageContext;

    #[test]
    fn admin_event_carries_intake_answers() {
        let ctx = SageContext::create_inmemory();
        let mut contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), 0);
        contact.intake_answers = vec![IntakeAnswer {
            question: "What brings you in?".into(),
            answer: "Stress at work".into(),
        }];
        let appointment = Appointment::new(1000, 900_000, 0);

        let payload = admin_calendar_event(
            &contact,
            &appointment,
            "Monday, August 3 at 9:00 AM",
            BookingAction::Booked,
            &ctx,
        );
        match payload {
            NotificationPayload::AdminCalendarEvent { event, .. } => {
                assert!(event.description.contains("What brings you in?: Stress at work"));
                assert_eq!(event.start_ts, 1000);
                assert_eq!(event.end_ts, 901_000);
                assert_eq!(event.attendee, "robin@example.com");
            }
            other => panic!("expected admin calendar event, got {:?}", other),
        }
    }

    #[test]
    fn client_confirmation_has_no_calendar_fields() {
        let contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), 0);
        let payload =
            client_confirmation(&contact, "Monday, August 3 at 9:00 AM", BookingAction::Booked);
        match payload {
            NotificationPayload::ClientConfirmation { to, body, .. } => {
                assert_eq!(to, "robin@example.com");
                assert!(body.contains("Monday, August 3 at 9:00 AM"));
            }
            other => panic!("expected client confirmation, got {:?}", other),
        }
    }
}
