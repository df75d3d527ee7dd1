use crate::dtos::{AppointmentDTO, DaySlotsDTO};
use sage_scheduler_domain::{Appointment, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub contact_id: ID,
    pub appointment: AppointmentDTO,
}

impl AppointmentResponse {
    pub fn new(contact_id: ID, appointment: Appointment) -> Self {
        Self {
            contact_id,
            appointment: AppointmentDTO::new(appointment),
        }
    }
}

pub mod get_available_slots {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub start_date: String,
        pub end_date: String,
        /// Set in a reschedule flow so the contact's own slot stays open and
        /// the same-day origin exception can apply.
        pub contact_id: Option<ID>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub dates: Vec<DaySlotsDTO>,
    }

    impl APIResponse {
        pub fn new(dates: Vec<DaySlotsDTO>) -> Self {
            Self { dates }
        }
    }
}

pub mod book_appointment {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub contact_id: ID,
        pub start_ts: i64,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod reschedule_appointment {
    use super::*;

    // The single field maps to the `{cancel_token}` route segment, which is
    // snake_case on the wire; no camelCase rename here or extraction fails.
    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub cancel_token: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub start_ts: i64,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod cancel_appointment {
    use super::*;

    // Snake_case `{cancel_token}` route segment; no camelCase rename.
    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub cancel_token: String,
    }

    pub type APIResponse = AppointmentResponse;
}
