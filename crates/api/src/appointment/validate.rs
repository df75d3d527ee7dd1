use sage_scheduler_domain::{
    booking_slots::{self, DaySlotsOptions},
    conflict,
    eligibility::EligibilityPolicy,
    Day, LocalTime, Slot, TimeSpan, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::SageContext;

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

/// Why a requested slot was turned down. Validation failures are data, not
/// errors: callers map them to typed rejections the booking UI can branch on.
#[derive(Debug, PartialEq)]
pub enum SlotRejection {
    /// The requested instant could not be interpreted in the business
    /// timezone.
    InvalidStart,
    Ineligible(String),
    Conflict,
    Storage,
}

/// Requester context threaded through validation. Empty for a first booking;
/// a reschedule carries the contact and their existing appointment so the
/// conflict carve-out and the same-day origin exception apply.
pub struct SlotCheck<'a> {
    pub requester_id: Option<&'a ID>,
    pub requester_existing_start: Option<i64>,
    pub reschedule_origin: Option<Day>,
}

impl<'a> SlotCheck<'a> {
    pub fn new_booking() -> Self {
        Self {
            requester_id: None,
            requester_existing_start: None,
            reschedule_origin: None,
        }
    }
}

pub struct CheckedSlot {
    pub slot: Slot,
    pub day: Day,
}

/// The authoritative write-time validation: alignment against the generated
/// slots, eligibility policy, then a conflict check against a freshly fetched
/// ledger. The client's own availability view is advisory only and never
/// trusted here.
pub async fn check_requested_slot(
    start_ts: i64,
    check: SlotCheck<'_>,
    ctx: &SageContext,
) -> Result<CheckedSlot, SlotRejection> {
    let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
    let now = ctx.sys.get_timestamp_millis();

    let (day, _) = normalizer
        .to_local(start_ts)
        .map_err(|_| SlotRejection::InvalidStart)?;

    let slot = booking_slots::generate_day_slots(
        &day,
        &DaySlotsOptions {
            template: &ctx.config.availability,
            normalizer: &normalizer,
            duration: ctx.config.slot_duration,
        },
    )
    .into_iter()
    .find(|slot| booking_slots::starts_match(slot.start_ts, start_ts))
    .ok_or_else(|| {
        SlotRejection::Ineligible("the requested time is outside the practice's availability".into())
    })?;

    let eligibility = EligibilityPolicy {
        policy: &ctx.config.scheduling,
        template: &ctx.config.availability,
        normalizer: &normalizer,
    };
    if !eligibility.is_date_selectable(&day, now, check.reschedule_origin.as_ref()) {
        return Err(SlotRejection::Ineligible(
            "the requested date is not open for booking".into(),
        ));
    }
    if !eligibility.is_slot_eligible(slot.start_ts, now) {
        return Err(SlotRejection::Ineligible(
            "the requested time is too soon".into(),
        ));
    }

    let ledger = ctx
        .repos
        .contacts
        .booked_slots_in_range(&day_span(&day, &normalizer, slot.start_ts))
        .await
        .map_err(|_| SlotRejection::Storage)?;
    if !conflict::is_slot_available(
        slot.start_ts,
        &ledger,
        check.requester_id,
        check.requester_existing_start,
    ) {
        return Err(SlotRejection::Conflict);
    }

    Ok(CheckedSlot { slot, day })
}

/// The ledger span covering one local calendar day. Falls back to a window
/// around the candidate when midnight cannot be resolved.
fn day_span(day: &Day, normalizer: &TimeZoneNormalizer, candidate_start: i64) -> TimeSpan {
    let midnight = LocalTime::new(0, 0);
    let start = normalizer.to_instant(day, &midnight);
    let mut next_day = day.clone();
    next_day.inc();
    let end = normalizer.to_instant(&next_day, &midnight);
    match (start, end) {
        (Ok(start), Ok(end)) => TimeSpan::new(start, end - 1),
        _ => TimeSpan::new(candidate_start - DAY_MILLIS, candidate_start + DAY_MILLIS),
    }
}

/// Timestamp prefix for the contact's audit notes.
pub fn note_stamp(normalizer: &TimeZoneNormalizer, now: i64) -> String {
    normalizer
        .instant_label(now)
        .unwrap_or_else(|_| now.to_string())
}
