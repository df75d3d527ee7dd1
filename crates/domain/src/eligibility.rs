use crate::availability::AvailabilityTemplate;
use crate::date::Day;
use crate::timezone::TimeZoneNormalizer;
use chrono::{Duration, Weekday};

/// The booking rules the practice runs on. Injected from configuration so
/// tests and deployments can tune them without touching the policy logic.
#[derive(Debug, Clone)]
pub struct SchedulingPolicy {
    /// Minimum gap between "now" and a bookable instant, in millis.
    pub min_lead_time_millis: i64,
    /// Maximum number of business days (Mon-Fri) a date may lie ahead of
    /// today, counted strictly after today.
    pub horizon_business_days: u32,
    /// Weekdays whose appointments may be rescheduled to the same day. The
    /// practice keeps same-day service for end-of-week origins only.
    pub same_day_reschedule_weekdays: Vec<Weekday>,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            min_lead_time_millis: 1000 * 60 * 60 * 4,
            horizon_business_days: 3,
            same_day_reschedule_weekdays: vec![Weekday::Thu, Weekday::Fri],
        }
    }
}

fn is_business_day(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Number of business days needed to reach `date` when walking forward one
/// calendar day at a time from the day after `today`, counting Mon-Fri only.
/// `None` when `date` is not strictly after `today`.
pub fn business_days_ahead(today: &Day, date: &Day) -> Option<u32> {
    if date <= today {
        return None;
    }
    let mut cursor = today.clone();
    let mut count = 0;
    while &cursor < date {
        cursor.inc();
        if is_business_day(cursor.weekday()) {
            count += 1;
        }
    }
    Some(count)
}

/// Applies the lead-time, booking-horizon and same-day rules. All rules are
/// conjunctive: failing any one makes a date or slot ineligible.
pub struct EligibilityPolicy<'a> {
    pub policy: &'a SchedulingPolicy,
    pub template: &'a AvailabilityTemplate,
    pub normalizer: &'a TimeZoneNormalizer,
}

impl<'a> EligibilityPolicy<'a> {
    /// Whether `date` is open for selection at all. `reschedule_origin` is
    /// the calendar date of the requester's existing appointment when the
    /// check runs inside a reschedule flow; it unlocks same-day reselection
    /// for the configured origin weekdays.
    pub fn is_date_selectable(
        &self,
        date: &Day,
        now: i64,
        reschedule_origin: Option<&Day>,
    ) -> bool {
        if !self.template.has_windows(date.weekday()) {
            return false;
        }
        let today = match self.normalizer.to_local(now) {
            Ok((day, _)) => day,
            Err(_) => return false,
        };
        if date < &today {
            return false;
        }
        if date == &today {
            return match reschedule_origin {
                Some(origin) => self
                    .policy
                    .same_day_reschedule_weekdays
                    .contains(&origin.weekday()),
                None => false,
            };
        }
        match business_days_ahead(&today, date) {
            Some(days) => days <= self.policy.horizon_business_days,
            None => false,
        }
    }

    /// Lead-time rule. The comparison happens in local wall-clock time so the
    /// four-hour window does not stretch or shrink across a DST boundary.
    pub fn is_slot_eligible(&self, slot_start: i64, now: i64) -> bool {
        let now_local = match self.normalizer.to_local_datetime(now) {
            Ok(dt) => dt,
            Err(_) => return false,
        };
        let slot_local = match self.normalizer.to_local_datetime(slot_start) {
            Ok(dt) => dt,
            Err(_) => return false,
        };
        slot_local >= now_local + Duration::milliseconds(self.policy.min_lead_time_millis)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::availability::{AvailabilityRule, AvailabilityWindow, LocalTime};

    fn day(year: i32, month: u32, day: u32) -> Day {
        Day { year, month, day }
    }

    fn weekday_template() -> AvailabilityTemplate {
        let window = AvailabilityWindow {
            start: LocalTime::new(9, 0),
            end: LocalTime::new(17, 0),
        };
        AvailabilityTemplate::new(
            (1..=5)
                .map(|weekday| AvailabilityRule {
                    weekday,
                    windows: vec![window.clone()],
                })
                .collect(),
        )
    }

    struct Fixture {
        policy: SchedulingPolicy,
        template: AvailabilityTemplate,
        normalizer: TimeZoneNormalizer,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                policy: SchedulingPolicy::default(),
                template: weekday_template(),
                normalizer: TimeZoneNormalizer::default(),
            }
        }

        fn eligibility(&self) -> EligibilityPolicy<'_> {
            EligibilityPolicy {
                policy: &self.policy,
                template: &self.template,
                normalizer: &self.normalizer,
            }
        }

        fn instant(&self, d: &Day, hours: u32, minutes: u32) -> i64 {
            self.normalizer
                .to_instant(d, &LocalTime::new(hours, minutes))
                .unwrap()
        }
    }

    #[test]
    fn counts_business_days_only() {
        // 2026-08-03 is a Monday
        let monday = day(2026, 8, 3);
        assert_eq!(business_days_ahead(&monday, &day(2026, 8, 4)), Some(1));
        assert_eq!(business_days_ahead(&monday, &day(2026, 8, 6)), Some(3));
        assert_eq!(business_days_ahead(&monday, &day(2026, 8, 7)), Some(4));
        // the following Monday is only five business days out, weekend skipped
        assert_eq!(business_days_ahead(&monday, &day(2026, 8, 10)), Some(5));
        assert_eq!(business_days_ahead(&monday, &monday), None);
        assert_eq!(business_days_ahead(&monday, &day(2026, 8, 1)), None);
    }

    #[test]
    fn horizon_allows_three_business_days() {
        let fixture = Fixture::new();
        let monday = day(2026, 8, 3);
        let now = fixture.instant(&monday, 8, 0);
        let eligibility = fixture.eligibility();

        // Thursday is 3 business days ahead, Friday is 4
        assert!(eligibility.is_date_selectable(&day(2026, 8, 6), now, None));
        assert!(!eligibility.is_date_selectable(&day(2026, 8, 7), now, None));
    }

    #[test]
    fn same_day_needs_a_permitted_reschedule_origin() {
        let fixture = Fixture::new();
        let thursday = day(2026, 8, 6);
        let friday = day(2026, 8, 7);
        let tuesday = day(2026, 8, 4);
        let eligibility = fixture.eligibility();

        let now = fixture.instant(&thursday, 8, 0);
        // plain booking: never same-day
        assert!(!eligibility.is_date_selectable(&thursday, now, None));
        // reschedule of a Thursday appointment: same-day allowed
        assert!(eligibility.is_date_selectable(&thursday, now, Some(&thursday)));

        // reschedule of a Tuesday appointment: same-day still closed
        let now = fixture.instant(&tuesday, 8, 0);
        assert!(!eligibility.is_date_selectable(&tuesday, now, Some(&tuesday)));

        let now = fixture.instant(&friday, 8, 0);
        assert!(eligibility.is_date_selectable(&friday, now, Some(&friday)));
    }

    #[test]
    fn past_dates_and_closed_weekdays_are_never_selectable() {
        let fixture = Fixture::new();
        let monday = day(2026, 8, 3);
        let now = fixture.instant(&monday, 8, 0);
        let eligibility = fixture.eligibility();

        assert!(!eligibility.is_date_selectable(&day(2026, 7, 31), now, None));
        // Saturday has no windows
        assert!(!eligibility.is_date_selectable(&day(2026, 8, 8), now, None));
    }

    #[test]
    fn lead_time_is_four_hours() {
        let fixture = Fixture::new();
        let monday = day(2026, 8, 3);
        let now = fixture.instant(&monday, 8, 0);
        let eligibility = fixture.eligibility();

        // Scenario: every slot before 12:00 fails the four-hour rule
        assert!(!eligibility.is_slot_eligible(fixture.instant(&monday, 9, 0), now));
        assert!(!eligibility.is_slot_eligible(fixture.instant(&monday, 11, 45), now));
        assert!(eligibility.is_slot_eligible(fixture.instant(&monday, 12, 0), now));
        assert!(eligibility.is_slot_eligible(fixture.instant(&monday, 16, 30), now));
    }

    #[test]
    fn custom_policy_knobs_are_honored() {
        let mut fixture = Fixture::new();
        fixture.policy.horizon_business_days = 1;
        fixture.policy.same_day_reschedule_weekdays = vec![Weekday::Tue];
        let eligibility = fixture.eligibility();

        let monday = day(2026, 8, 3);
        let now = fixture.instant(&monday, 8, 0);
        assert!(eligibility.is_date_selectable(&day(2026, 8, 4), now, None));
        assert!(!eligibility.is_date_selectable(&day(2026, 8, 5), now, None));

        let tuesday = day(2026, 8, 4);
        let now = fixture.instant(&tuesday, 8, 0);
        assert!(eligibility.is_date_selectable(&tuesday, now, Some(&tuesday)));
    }
}
