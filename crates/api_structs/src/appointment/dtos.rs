use sage_scheduler_domain::{Appointment, AppointmentStatus, DaySlots, Slot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDTO {
    pub scheduled_at: i64,
    pub duration: i64,
    pub status: AppointmentStatus,
    pub cancel_token: String,
    pub created: i64,
    pub updated: i64,
}

impl AppointmentDTO {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            scheduled_at: appointment.scheduled_at,
            duration: appointment.duration,
            status: appointment.status,
            cancel_token: appointment.cancel_token,
            created: appointment.created,
            updated: appointment.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SlotDTO {
    pub start_ts: i64,
    pub duration: i64,
    pub local_label: String,
}

impl SlotDTO {
    pub fn new(slot: Slot) -> Self {
        Self {
            start_ts: slot.start_ts,
            duration: slot.duration,
            local_label: slot.local_label,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DaySlotsDTO {
    pub date: String,
    pub slots: Vec<SlotDTO>,
}

impl DaySlotsDTO {
    pub fn new(day_slots: DaySlots) -> Self {
        Self {
            date: day_slots.date.to_string(),
            slots: day_slots.slots.into_iter().map(SlotDTO::new).collect(),
        }
    }
}
