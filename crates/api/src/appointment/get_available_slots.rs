use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use sage_scheduler_api_structs::dtos::DaySlotsDTO;
use sage_scheduler_api_structs::get_available_slots::*;
use sage_scheduler_domain::{
    booking_slots::{self, DaySlotsOptions},
    conflict,
    eligibility::EligibilityPolicy,
    Day, DaySlots, LocalTime, TimeSpan, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::SageContext;

pub async fn get_available_slots_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SageContext>,
) -> Result<HttpResponse, ApiError> {
    let query_params = query_params.0;
    let usecase = GetAvailableSlotsUseCase {
        start_date: query_params.start_date,
        end_date: query_params.end_date,
        contact_id: query_params.contact_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(
                res.dates.into_iter().map(DaySlotsDTO::new).collect(),
            ))
        })
        .map_err(|e| match e {
            UseCaseError::InvalidDate(msg) => ApiError::BadClientData(format!(
                "Invalid datetime: {}. Should be YYYY-MM-DD, e.g. January 1. 2026 => 2026-1-1",
                msg
            )),
            UseCaseError::InvalidTimespan => {
                ApiError::BadClientData("The provided start_date and end_date is invalid".into())
            }
            UseCaseError::ContactNotFound(contact_id) => ApiError::NotFound(format!(
                "The contact with id: {}, was not found.",
                contact_id
            )),
            UseCaseError::StorageError => ApiError::InternalError,
        })
}

/// The advisory read path behind the booking calendar. The authoritative
/// checks run again inside the write path at submission time.
#[derive(Debug)]
pub struct GetAvailableSlotsUseCase {
    pub start_date: String,
    pub end_date: String,
    pub contact_id: Option<ID>,
}

#[derive(Debug)]
pub struct AvailableDates {
    pub dates: Vec<DaySlots>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidDate(String),
    InvalidTimespan,
    ContactNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAvailableSlotsUseCase {
    type Response = AvailableDates;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAvailableSlots";

    async fn execute(&mut self, ctx: &SageContext) -> Result<Self::Response, Self::Error> {
        let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
        let now = ctx.sys.get_timestamp_millis();

        let start_day = self
            .start_date
            .parse::<Day>()
            .map_err(|_| UseCaseError::InvalidDate(self.start_date.clone()))?;
        let end_day = self
            .end_date
            .parse::<Day>()
            .map_err(|_| UseCaseError::InvalidDate(self.end_date.clone()))?;
        if end_day < start_day {
            return Err(UseCaseError::InvalidTimespan);
        }

        let midnight = LocalTime::new(0, 0);
        let start_ts = normalizer
            .to_instant(&start_day, &midnight)
            .map_err(|_| UseCaseError::InvalidDate(self.start_date.clone()))?;
        let mut end_boundary = end_day.clone();
        end_boundary.inc();
        let end_ts = normalizer
            .to_instant(&end_boundary, &midnight)
            .map_err(|_| UseCaseError::InvalidDate(self.end_date.clone()))?
            - 1;

        let timespan = TimeSpan::new(start_ts, end_ts);
        if timespan.greater_than(ctx.config.booking_slots_query_duration_limit) {
            return Err(UseCaseError::InvalidTimespan);
        }

        // a reschedule flow keeps the requester's own slot selectable and may
        // unlock same-day reselection
        let requester = match &self.contact_id {
            Some(contact_id) => match ctx.repos.contacts.find(contact_id).await {
                Some(contact) => Some(contact),
                None => return Err(UseCaseError::ContactNotFound(contact_id.clone())),
            },
            None => None,
        };
        let existing_start = requester
            .as_ref()
            .and_then(|contact| contact.active_appointment())
            .map(|appointment| appointment.scheduled_at);
        let origin_day = existing_start
            .and_then(|ts| normalizer.to_local(ts).ok())
            .map(|(day, _)| day);

        let ledger = ctx
            .repos
            .contacts
            .booked_slots_in_range(&timespan)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let eligibility = EligibilityPolicy {
            policy: &ctx.config.scheduling,
            template: &ctx.config.availability,
            normalizer: &normalizer,
        };

        let mut dates = Vec::new();
        let mut cursor = start_day;
        while cursor <= end_day {
            if eligibility.is_date_selectable(&cursor, now, origin_day.as_ref()) {
                let slots = booking_slots::generate_day_slots(
                    &cursor,
                    &DaySlotsOptions {
                        template: &ctx.config.availability,
                        normalizer: &normalizer,
                        duration: ctx.config.slot_duration,
                    },
                )
                .into_iter()
                .filter(|slot| eligibility.is_slot_eligible(slot.start_ts, now))
                .filter(|slot| {
                    conflict::is_slot_available(
                        slot.start_ts,
                        &ledger,
                        self.contact_id.as_ref(),
                        existing_start,
                    )
                })
                .collect::<Vec<_>>();
                if !slots.is_empty() {
                    dates.push(DaySlots {
                        date: cursor.clone(),
                        slots,
                    });
                }
            }
            cursor.inc();
        }

        Ok(AvailableDates { dates })
    }
}
