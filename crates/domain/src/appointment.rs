use sage_scheduler_utils::create_random_secret;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CANCEL_TOKEN_LENGTH: usize = 24;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
    Pending,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Pending => "pending",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            _ => Err(()),
        }
    }
}

/// The appointment projection embedded in a `Contact`. Rescheduling rewrites
/// `scheduled_at` in place and keeps the token; cancelling is a terminal
/// status transition that preserves the record for history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub scheduled_at: i64,
    pub duration: i64,
    pub status: AppointmentStatus,
    /// Opaque capability for the cancel/reschedule deep-links mailed to the
    /// contact. Grants control over this one appointment and nothing else.
    pub cancel_token: String,
    pub created: i64,
    pub updated: i64,
}

impl Appointment {
    pub fn new(scheduled_at: i64, duration: i64, now: i64) -> Self {
        Self {
            scheduled_at,
            duration,
            status: AppointmentStatus::Scheduled,
            cancel_token: create_random_secret(CANCEL_TOKEN_LENGTH),
            created: now,
            updated: now,
        }
    }

    pub fn end_ts(&self) -> i64 {
        self.scheduled_at + self.duration
    }

    /// Whether this appointment still claims its slot in the booking ledger.
    pub fn blocks_slot(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    pub fn reschedule(&mut self, new_start: i64, now: i64) {
        self.scheduled_at = new_start;
        self.status = AppointmentStatus::Scheduled;
        self.updated = now;
    }

    pub fn cancel(&mut self, now: i64) {
        self.status = AppointmentStatus::Cancelled;
        self.updated = now;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reschedule_keeps_the_token() {
        let mut appointment = Appointment::new(1000, 900_000, 500);
        let token = appointment.cancel_token.clone();
        appointment.reschedule(2000, 600);
        assert_eq!(appointment.scheduled_at, 2000);
        assert_eq!(appointment.cancel_token, token);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.updated, 600);
    }

    #[test]
    fn cancel_frees_the_slot_but_keeps_the_record() {
        let mut appointment = Appointment::new(1000, 900_000, 500);
        assert!(appointment.blocks_slot());
        appointment.cancel(700);
        assert!(!appointment.blocks_slot());
        assert_eq!(appointment.scheduled_at, 1000);
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn status_roundtrips_through_strings() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
            AppointmentStatus::Pending,
        ] {
            assert_eq!(status.to_string().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("unknown".parse::<AppointmentStatus>().is_err());
    }
}
