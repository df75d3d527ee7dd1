use super::notify::{admin_calendar_event, client_confirmation, BookingAction};
use super::validate::note_stamp;
use crate::error::ApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use sage_scheduler_api_structs::cancel_appointment::*;
use sage_scheduler_domain::{
    date::format_slot_label, Appointment, Contact, DashboardNotification, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::SageContext;
use tracing::warn;

pub async fn cancel_appointment_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<SageContext>,
) -> Result<HttpResponse, ApiError> {
    let contact = ctx
        .repos
        .contacts
        .find_by_cancel_token(&path_params.cancel_token)
        .await
        .ok_or_else(|| {
            ApiError::NotFound("No appointment matches the provided link.".into())
        })?;

    let usecase = CancelAppointmentUseCase {
        contact_id: contact.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(res.contact.id.clone(), res.appointment))
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct CancelAppointmentUseCase {
    pub contact_id: ID,
}

#[derive(Debug)]
pub struct CancelledAppointment {
    pub contact: Contact,
    pub appointment: Appointment,
    pub slot_label: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ContactNotFound(ID),
    AppointmentNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ContactNotFound(contact_id) => Self::NotFound(format!(
                "The contact with id: {}, was not found.",
                contact_id
            )),
            UseCaseError::AppointmentNotFound(contact_id) => Self::NotFound(format!(
                "The contact with id: {}, has no appointment to cancel.",
                contact_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelAppointmentUseCase {
    type Response = CancelledAppointment;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelAppointment";

    async fn execute(&mut self, ctx: &SageContext) -> Result<Self::Response, Self::Error> {
        let mut contact = match ctx.repos.contacts.find(&self.contact_id).await {
            Some(contact) => contact,
            None => return Err(UseCaseError::ContactNotFound(self.contact_id.clone())),
        };
        let mut appointment = match contact.active_appointment() {
            Some(appointment) => appointment.clone(),
            None => return Err(UseCaseError::AppointmentNotFound(self.contact_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
        let slot_label = normalizer
            .to_local(appointment.scheduled_at)
            .map(|(day, time)| format_slot_label(&day, &time))
            .unwrap_or_else(|_| appointment.scheduled_at.to_string());

        // status transition only; the record stays for history and the slot
        // falls out of the booking ledger
        appointment.cancel(now);
        contact.appointment = Some(appointment.clone());
        contact.status_label = "appointment cancelled".into();
        contact.append_note(&format!(
            "[{}] Appointment for {} cancelled",
            note_stamp(&normalizer, now),
            slot_label
        ));
        contact.updated = now;

        ctx.repos
            .contacts
            .save(&contact)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(CancelledAppointment {
            contact,
            appointment,
            slot_label,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(NotifyContactOnCancellation),
            Box::new(NotifyAdminOnCancellation),
        ]
    }
}

pub struct NotifyContactOnCancellation;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelAppointmentUseCase> for NotifyContactOnCancellation {
    async fn notify(&self, e: &CancelledAppointment, ctx: &SageContext) {
        let payload = client_confirmation(&e.contact, &e.slot_label, BookingAction::Cancelled);
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Cancellation confirmation for contact {} was not delivered",
                e.contact.id
            );
        }
    }
}

pub struct NotifyAdminOnCancellation;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelAppointmentUseCase> for NotifyAdminOnCancellation {
    async fn notify(&self, e: &CancelledAppointment, ctx: &SageContext) {
        let payload = admin_calendar_event(
            &e.contact,
            &e.appointment,
            &e.slot_label,
            BookingAction::Cancelled,
            ctx,
        );
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Admin notification for contact {} cancellation was not delivered",
                e.contact.id
            );
        }

        let record = DashboardNotification::new(
            e.contact.id.clone(),
            format!("{} cancelled their appointment on {}", e.contact.full_name, e.slot_label),
            ctx.sys.get_timestamp_millis(),
        );
        if ctx.repos.notifications.insert(&record).await.is_err() {
            warn!(
                "Dashboard notification for contact {} cancellation was not recorded",
                e.contact.id
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::appointment::book_appointment::BookAppointmentUseCase;
    use chrono::TimeZone;
    use sage_scheduler_infra::StaticTimeSys;
    use std::sync::Arc;

    fn eastern_ts(year: i32, month: u32, day: u32, hours: u32, minutes: u32) -> i64 {
        chrono_tz::America::New_York
            .with_ymd_and_hms(year, month, day, hours, minutes, 0)
            .unwrap()
            .timestamp_millis()
    }

    async fn setup(now: i64, scheduled_at: i64) -> (SageContext, Contact) {
        let mut ctx = SageContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {
            timestamp_millis: now,
        });
        let mut contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), now);
        contact.appointment = Some(Appointment::new(
            scheduled_at,
            ctx.config.slot_duration,
            now,
        ));
        ctx.repos.contacts.insert(&contact).await.unwrap();
        (ctx, contact)
    }

    #[actix_web::test]
    async fn cancels_without_deleting_history() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let scheduled_at = eastern_ts(2026, 8, 4, 9, 0);
        let (ctx, contact) = setup(now, scheduled_at).await;

        let usecase = CancelAppointmentUseCase {
            contact_id: contact.id.clone(),
        };
        let res = execute(usecase, &ctx).await.expect("To cancel");
        assert!(!res.appointment.blocks_slot());

        let saved = ctx.repos.contacts.find(&contact.id).await.unwrap();
        let appointment = saved.appointment.expect("Record to remain");
        assert_eq!(appointment.scheduled_at, scheduled_at);
        assert!(!appointment.blocks_slot());
        assert!(saved.notes.contains("cancelled"));
    }

    #[actix_web::test]
    async fn cancelling_frees_the_slot_for_others() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let scheduled_at = eastern_ts(2026, 8, 4, 9, 0);
        let (ctx, contact) = setup(now, scheduled_at).await;

        let usecase = CancelAppointmentUseCase {
            contact_id: contact.id.clone(),
        };
        execute(usecase, &ctx).await.expect("To cancel");

        let other = Contact::new("Sam Lee".into(), "sam@example.com".into(), now);
        ctx.repos.contacts.insert(&other).await.unwrap();
        let usecase = BookAppointmentUseCase {
            contact_id: other.id.clone(),
            start_ts: scheduled_at,
        };
        assert!(execute(usecase, &ctx).await.is_ok());
    }

    #[actix_web::test]
    async fn double_cancel_is_an_error() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let (ctx, contact) = setup(now, eastern_ts(2026, 8, 4, 9, 0)).await;

        let usecase = CancelAppointmentUseCase {
            contact_id: contact.id.clone(),
        };
        execute(usecase, &ctx).await.expect("To cancel");

        let usecase = CancelAppointmentUseCase {
            contact_id: contact.id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::AppointmentNotFound(contact.id)
        );
    }

    #[actix_web::test]
    async fn unknown_contact_is_an_error() {
        let ctx = SageContext::create_inmemory();
        let missing = ID::new();

        let usecase = CancelAppointmentUseCase {
            contact_id: missing.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::ContactNotFound(missing));
    }
}
