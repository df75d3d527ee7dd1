use super::notify::{admin_calendar_event, client_confirmation, BookingAction};
use super::validate::{check_requested_slot, note_stamp, SlotCheck, SlotRejection};
use crate::error::ApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use sage_scheduler_api_structs::book_appointment::*;
use sage_scheduler_domain::{
    Appointment, Contact, DashboardNotification, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::SageContext;
use tracing::warn;

pub async fn book_appointment_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<SageContext>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = BookAppointmentUseCase {
        contact_id: body.contact_id,
        start_ts: body.start_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse::new(res.contact.id.clone(), res.appointment))
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct BookAppointmentUseCase {
    pub contact_id: ID,
    pub start_ts: i64,
}

#[derive(Debug)]
pub struct BookedAppointment {
    pub contact: Contact,
    pub appointment: Appointment,
    pub slot_label: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ContactNotFound(ID),
    InvalidStart(i64),
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
            UseCaseError::InvalidStart(start_ts) => Self::BadClientData(format!(
                "The requested start: {} is not a valid instant.",
                start_ts
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
impl UseCase for BookAppointmentUseCase {
    type Response = BookedAppointment;

    type Error = UseCaseError;

    const NAME: &'static str = "BookAppointment";

    async fn execute(&mut self, ctx: &SageContext) -> Result<Self::Response, Self::Error> {
        let mut contact = match ctx.repos.contacts.find(&self.contact_id).await {
            Some(contact) => contact,
            None => return Err(UseCaseError::ContactNotFound(self.contact_id.clone())),
        };

        let checked = check_requested_slot(self.start_ts, SlotCheck::new_booking(), ctx)
            .await
            .map_err(|rejection| match rejection {
                SlotRejection::InvalidStart => UseCaseError::InvalidStart(self.start_ts),
                other => other.into(),
            })?;

        let now = ctx.sys.get_timestamp_millis();
        let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
        let appointment = Appointment::new(checked.slot.start_ts, ctx.config.slot_duration, now);

        contact.appointment = Some(appointment.clone());
        contact.status_label = "appointment scheduled".into();
        contact.append_note(&format!(
            "[{}] Appointment booked for {}",
            note_stamp(&normalizer, now),
            checked.slot.local_label
        ));
        contact.updated = now;

        ctx.repos
            .contacts
            .save(&contact)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(BookedAppointment {
            contact,
            appointment,
            slot_label: checked.slot.local_label,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(NotifyContactOnBooking),
            Box::new(NotifyAdminOnBooking),
        ]
    }
}

/// Plain confirmation to the contact. Delivery failure is logged and never
/// affects the booking, which is already persisted at this point.
pub struct NotifyContactOnBooking;

#[async_trait::async_trait(?Send)]
impl Subscriber<BookAppointmentUseCase> for NotifyContactOnBooking {
    async fn notify(&self, e: &BookedAppointment, ctx: &SageContext) {
        let payload = client_confirmation(&e.contact, &e.slot_label, BookingAction::Booked);
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Booking confirmation for contact {} was not delivered",
                e.contact.id
            );
        }
    }
}

/// Admin notification with full calendar-event fields, plus a dashboard
/// notification record.
pub struct NotifyAdminOnBooking;

#[async_trait::async_trait(?Send)]
impl Subscriber<BookAppointmentUseCase> for NotifyAdminOnBooking {
    async fn notify(&self, e: &BookedAppointment, ctx: &SageContext) {
        let payload = admin_calendar_event(
            &e.contact,
            &e.appointment,
            &e.slot_label,
            BookingAction::Booked,
            ctx,
        );
        if !ctx.notifier.send(&payload).await {
            warn!(
                "Admin notification for contact {} booking was not delivered",
                e.contact.id
            );
        }

        let record = DashboardNotification::new(
            e.contact.id.clone(),
            format!("{} booked {}", e.contact.full_name, e.slot_label),
            ctx.sys.get_timestamp_millis(),
        );
        if ctx.repos.notifications.insert(&record).await.is_err() {
            warn!(
                "Dashboard notification for contact {} booking was not recorded",
                e.contact.id
            );
        }
    }
}
