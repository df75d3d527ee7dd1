use crate::availability::{AvailabilityTemplate, LocalTime};
use crate::date::{format_slot_label, Day};
use crate::shared::entity::ID;
use crate::timezone::TimeZoneNormalizer;
use serde::Serialize;

/// Two slot starts refer to the same slot when they are within this
/// tolerance, which absorbs clock skew between the advisory client-side
/// availability check and the authoritative write-time check.
pub const SLOT_START_TOLERANCE_MILLIS: i64 = 1000 * 60;

pub const DEFAULT_SLOT_DURATION_MILLIS: i64 = 1000 * 60 * 15;

/// A candidate bookable time: an absolute start instant plus the label shown
/// to the contact. Ephemeral, always derived from the availability template.
#[derive(Serialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start_ts: i64,
    pub duration: i64,
    pub local_label: String,
}

/// A slot already claimed by a non-cancelled appointment, as read back from
/// the booking ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedSlot {
    pub start_ts: i64,
    pub end_ts: i64,
    pub contact_id: ID,
}

pub fn starts_match(a: i64, b: i64) -> bool {
    (a - b).abs() <= SLOT_START_TOLERANCE_MILLIS
}

pub struct DaySlotsOptions<'a> {
    pub template: &'a AvailabilityTemplate,
    pub normalizer: &'a TimeZoneNormalizer,
    /// Slot duration in millis.
    pub duration: i64,
}

/// Expands one calendar day of the availability template into ordered
/// candidate slots. Pure in its inputs, so the same day and template always
/// produce the same sequence.
///
/// The cursor walks each window in duration-sized steps and stops as soon as
/// the next step would pass the window end; a window that is not evenly
/// divisible by the slot duration loses its trailing remainder. Local times
/// swallowed by a DST transition have no instant and are skipped.
pub fn generate_day_slots(day: &Day, opts: &DaySlotsOptions<'_>) -> Vec<Slot> {
    let mut slots = Vec::new();
    let duration_mins = opts.duration / (1000 * 60);
    if duration_mins < 1 {
        return slots;
    }
    let duration_mins = duration_mins as u32;

    for window in opts.template.windows_for(day.weekday()) {
        let mut cursor = window.start.minutes_of_day();
        let end = window.end.minutes_of_day();
        while cursor + duration_mins <= end {
            let time = LocalTime::from_minutes_of_day(cursor);
            if let Ok(start_ts) = opts.normalizer.to_instant(day, &time) {
                slots.push(Slot {
                    start_ts,
                    duration: opts.duration,
                    local_label: format_slot_label(day, &time),
                });
            }
            cursor += duration_mins;
        }
    }

    slots
}

/// The slots of one calendar date, as presented to the booking UI.
#[derive(Debug, PartialEq)]
pub struct DaySlots {
    pub date: Day,
    pub slots: Vec<Slot>,
}
