use crate::booking_slots::{starts_match, BookedSlot};
use crate::shared::entity::ID;

/// Decides whether `candidate_start` can still be claimed given the booked
/// slots read from the ledger. A requester re-selecting their own current
/// appointment instant is always allowed, so a reschedule can keep the
/// original time.
///
/// Only start instants are compared. Two bookings that overlap without
/// sharing a start are not detected here, and the ledger is only as fresh as
/// the caller's fetch; racing writers are serialized by the store, if at all.
pub fn is_slot_available(
    candidate_start: i64,
    ledger: &[BookedSlot],
    requester_id: Option<&ID>,
    requester_existing_start: Option<i64>,
) -> bool {
    for booked in ledger {
        if !starts_match(booked.start_ts, candidate_start) {
            continue;
        }
        let own_current_slot = match (requester_id, requester_existing_start) {
            (Some(requester), Some(existing)) => {
                booked.contact_id == *requester && starts_match(booked.start_ts, existing)
            }
            _ => false,
        };
        if !own_current_slot {
            return false;
        }
    }
    true
}
