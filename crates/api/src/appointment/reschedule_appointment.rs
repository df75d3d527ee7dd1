use super::notify::{admin_calendar_event, client_confirmation, BookingAction};
use super::validate::{check_requested_slot, note_stamp, SlotCheck, SlotRejection};
use crate::error::ApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use sage_scheduler_api_structs::reschedule_appointment::*;
use sage_scheduler_domain::{
    Appointment, Contact, DashboardNotification, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::SageContext;
use tracing::warn;

pub async fn reschedule_appointment_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
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

    let usecase = RescheduleAppointmentUseCase {
        contact_id: contact.id,
        new_start_ts: body.0.start_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(res.contact.id.clone(), res.appointment))
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct RescheduleAppointmentUseCase {
    pub contact_id: ID,
    pub new_start_ts: i64,
}

#[derive(Debug)]
pub struct RescheduledAppointment {
    pub contact: Contact,
    pub appointment: Appointment,
    pub slot_label: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ContactNotFound(ID),
    /// The contact has no live appointment to move.
    AppointmentNotFound(ID),
    SlotIneligible(String),
    SlotConflict,
    StorageError,
}

impl From<SlotRejection> for UseCaseError {
    fn from(rejection: SlotRejection) -> Self {
        match rejection {
            SlotRejection::InvalidStart => Self::SlotIneligible("unparseable instant".into()),
            SlotRejection::Ineligible(reason) => Self::SlotIneligible(reason),
            SlotRejection::Conflict => Self::SlotConflict,
            SlotRejection::Storage => Self::StorageError,
        }
    }
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ContactNotFound(contact_id) => Self::NotFound(format!(
                "The contact with id: {}, was not found.",
                contact_id
            )),
            UseCaseError::AppointmentNotFound(contact_id) => Self::NotFound(format!(
                "The contact with id: {}, has no appointment to reschedule.",
                contact_id
            )),
            UseCaseError::SlotIneligible(reason) => Self::BadClientData(format!(
                "The requested slot cannot be booked: {}. Please pick a different time.",
                reason
            )),
            UseCaseError::SlotConflict => Self::Conflict(
                "The requested slot was just taken. Please refresh availability and pick a different time.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleAppointmentUseCase {
    type Response = RescheduledAppointment;

    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleAppointment";

    async fn execute(&mut self, ctx: &SageContext) -> Result<Self::Response, Self::Error> {
        let mut contact = match ctx.repos.contacts.find(&self.contact_id).await {
            Some(contact) => contact,
            None => return Err(UseCaseError::ContactNotFound(self.contact_id.clone())),
        };
        let existing = match contact.active_appointment() {
            Some(appointment) => appointment.clone(),
            None => return Err(UseCaseError::AppointmentNotFound(self.contact_id.clone())),
        };

        let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
        // the origin date of the existing appointment drives the same-day
        // exception; the existing instant drives the conflict carve-out
        let origin_day = normalizer
            .to_local(existing.scheduled_at)
            .ok()
            .map(|(day, _)| day);
        let checked = check_requested_slot(
            self.new_start_ts,
            SlotCheck {
                requester_id: Some(&self.contact_id),
                requester_existing_start: Some(existing.scheduled_at),
                reschedule_origin: origin_day,
            },
            ctx,
        )
        .await
        .map_err(UseCaseError::from)?;

        let now = ctx.sys.get_timestamp_millis();
        let mut appointment = existing;
        appointment.reschedule(checked.slot.start_ts, now);

        contact.appointment = Some(appointment.clone());
        contact.status_label = "appointment scheduled".into();
        contact.append_note(&format!(
            "[{}] Appointment rescheduled to {}",
            note_stamp(&normalizer, now),
            checked.slot.local_label
        ));
        contact.updated = now;

        ctx.repos
            .contacts
            .save(&contact)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(RescheduledAppointment {
            contact,
            appointment,
            slot_label: checked.slot.local_label,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(NotifyContactOnReschedule),
            Box::new(NotifyAdminOnReschedule),
        ]
    }
}

pub struct NotifyContactOnReschedule;

#[async_trait::async_trait(?Send)]
impl Subscriber<RescheduleAppointmentUseCase> for NotifyContactOnReschedule {
    async fn notify(&self, e: &RescheduledAppointment, ctx: &SageContext) {
        let payload = client_confirmation(&e.contact, &e.slot_label, BookingAction::Rescheduled);
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Reschedule confirmation for contact {} was not delivered",
                e.contact.id
            );
        }
    }
}

pub struct NotifyAdminOnReschedule;

#[async_trait::async_trait(?Send)]
impl Subscriber<RescheduleAppointmentUseCase> for NotifyAdminOnReschedule {
    async fn notify(&self, e: &RescheduledAppointment, ctx: &SageContext) {
        let payload = admin_calendar_event(
            &e.contact,
            &e.appointment,
            &e.slot_label,
            BookingAction::Rescheduled,
            ctx,
        );
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Admin notification for contact {} reschedule was not delivered",
                e.contact.id
            );
        }

        let record = DashboardNotification::new(
            e.contact.id.clone(),
            format!("{} moved their appointment to {}", e.contact.full_name, e.slot_label),
            ctx.sys.get_timestamp_millis(),
        );
        if ctx.repos.notifications.insert(&record).await.is_err() {
            warn!(
                "Dashboard notification for contact {} reschedule was not recorded",
                e.contact.id
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use sage_scheduler_infra::StaticTimeSys;
    use std::sync::Arc;

    fn eastern_ts(year: i32, month: u32, day: u32, hours: u32, minutes: u32) -> i64 {
        chrono_tz::America::New_York
            .with_ymd_and_hms(year, month, day, hours, minutes, 0)
            .unwrap()
            .timestamp_millis()
    }

    struct TestContext {
        ctx: SageContext,
        contact: Contact,
    }

    /// Contact with a live appointment at `scheduled_at`, clock frozen at `now`.
    async fn setup(now: i64, scheduled_at: i64) -> TestContext {
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

        TestContext { ctx, contact }
    }

    #[actix_web::test]
    async fn moves_the_appointment_and_keeps_the_token() {
        // Monday morning; appointment on Tuesday 9:00, moved to Tuesday 9:30
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let TestContext { ctx, contact } = setup(now, eastern_ts(2026, 8, 4, 9, 0)).await;
        let token = contact.appointment.as_ref().unwrap().cancel_token.clone();

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: eastern_ts(2026, 8, 4, 9, 30),
        };
        let res = execute(usecase, &ctx).await.expect("To reschedule");

        assert_eq!(res.appointment.scheduled_at, eastern_ts(2026, 8, 4, 9, 30));
        assert_eq!(res.appointment.cancel_token, token);

        let saved = ctx.repos.contacts.find(&contact.id).await.unwrap();
        assert_eq!(
            saved.appointment.unwrap().scheduled_at,
            eastern_ts(2026, 8, 4, 9, 30)
        );
    }

    #[actix_web::test]
    async fn contact_can_reselect_their_current_slot() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let scheduled_at = eastern_ts(2026, 8, 4, 9, 0);
        let TestContext { ctx, contact } = setup(now, scheduled_at).await;

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: scheduled_at,
        };
        let res = execute(usecase, &ctx).await.expect("To keep the same slot");
        assert_eq!(res.appointment.scheduled_at, scheduled_at);
    }

    #[actix_web::test]
    async fn cannot_take_another_contacts_slot() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let TestContext { ctx, contact } = setup(now, eastern_ts(2026, 8, 4, 9, 0)).await;

        let mut other = Contact::new("Sam Lee".into(), "sam@example.com".into(), now);
        other.appointment = Some(Appointment::new(
            eastern_ts(2026, 8, 4, 10, 0),
            ctx.config.slot_duration,
            now,
        ));
        ctx.repos.contacts.insert(&other).await.unwrap();

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: eastern_ts(2026, 8, 4, 10, 0),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::SlotConflict);
    }

    #[actix_web::test]
    async fn thursday_origin_unlocks_same_day_reselection() {
        // Thursday morning; existing appointment later that Thursday
        let now = eastern_ts(2026, 8, 6, 8, 0);
        let TestContext { ctx, contact } = setup(now, eastern_ts(2026, 8, 6, 13, 0)).await;

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: eastern_ts(2026, 8, 6, 14, 0),
        };
        let res = execute(usecase, &ctx).await.expect("Same-day reschedule");
        assert_eq!(res.appointment.scheduled_at, eastern_ts(2026, 8, 6, 14, 0));
    }

    #[actix_web::test]
    async fn tuesday_origin_does_not_unlock_same_day() {
        let now = eastern_ts(2026, 8, 4, 8, 0);
        let TestContext { ctx, contact } = setup(now, eastern_ts(2026, 8, 4, 16, 0)).await;

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: eastern_ts(2026, 8, 4, 16, 30),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(
            res.unwrap_err(),
            UseCaseError::SlotIneligible(_)
        ));
    }

    #[actix_web::test]
    async fn requires_a_live_appointment() {
        let now = eastern_ts(2026, 8, 3, 8, 0);
        let mut ctx = SageContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {
            timestamp_millis: now,
        });
        let contact = Contact::new("Robin Doe".into(), "robin@example.com".into(), now);
        ctx.repos.contacts.insert(&contact).await.unwrap();

        let usecase = RescheduleAppointmentUseCase {
            contact_id: contact.id.clone(),
            new_start_ts: eastern_ts(2026, 8, 4, 9, 0),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::AppointmentNotFound(contact.id)
        );
    }
}
