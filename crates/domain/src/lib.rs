mod appointment;
mod availability;
pub mod booking_slots;
pub mod conflict;
mod contact;
pub mod date;
pub mod eligibility;
mod notification;
mod reminder;
mod shared;
mod timespan;
mod timezone;

pub use appointment::{Appointment, AppointmentStatus, CANCEL_TOKEN_LENGTH};
pub use availability::{AvailabilityRule, AvailabilityTemplate, AvailabilityWindow, LocalTime};
pub use booking_slots::{BookedSlot, DaySlots, Slot, DEFAULT_SLOT_DURATION_MILLIS};
pub use contact::{Contact, IntakeAnswer, STATUS_NEW_LEAD};
pub use date::Day;
pub use eligibility::{business_days_ahead, EligibilityPolicy, SchedulingPolicy};
pub use notification::DashboardNotification;
pub use reminder::{ReminderSchedule, ReminderStage, ReminderState, MAX_REMINDER_COUNT};
pub use shared::entity::{Entity, ID};
pub use timespan::TimeSpan;
pub use timezone::{TimeError, TimeZoneNormalizer};
