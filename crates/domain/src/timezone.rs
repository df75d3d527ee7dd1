use crate::availability::LocalTime;
use crate::date::Day;
use chrono::prelude::*;
use chrono::LocalResult;
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),
}

/// Converts between absolute unix-millis instants and wall-clock time in the
/// practice's fixed business timezone. Every other component consumes
/// instants and pre-converted labels from here; none of them do their own
/// offset math.
#[derive(Debug, Clone)]
pub struct TimeZoneNormalizer {
    tz: Tz,
}

impl TimeZoneNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn to_local_datetime(&self, ts: i64) -> Result<NaiveDateTime, TimeError> {
        match self.tz.timestamp_millis_opt(ts) {
            LocalResult::Single(dt) => Ok(dt.naive_local()),
            _ => Err(TimeError::InvalidInstant(ts.to_string())),
        }
    }

    pub fn to_local(&self, ts: i64) -> Result<(Day, LocalTime), TimeError> {
        let dt = self.to_local_datetime(ts)?;
        Ok((
            Day {
                year: dt.year(),
                month: dt.month(),
                day: dt.day(),
            },
            LocalTime::new(dt.hour(), dt.minute()),
        ))
    }

    /// Absolute instant for a local calendar date + time of day. A wall-clock
    /// time that does not exist in the business timezone (spring-forward gap)
    /// is an error, never clamped; an ambiguous one (fall-back hour) resolves
    /// to the earlier offset.
    pub fn to_instant(&self, day: &Day, time: &LocalTime) -> Result<i64, TimeError> {
        let date = day
            .naive()
            .ok_or_else(|| TimeError::InvalidInstant(day.to_string()))?;
        let time_of_day = NaiveTime::from_hms_opt(time.hours, time.minutes, 0)
            .ok_or_else(|| TimeError::InvalidInstant(format!("{} {}", day, time)))?;
        self.tz
            .from_local_datetime(&date.and_time(time_of_day))
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .ok_or_else(|| TimeError::InvalidInstant(format!("{} {}", day, time)))
    }

    /// Timestamp label used in audit notes, e.g. "2026-08-03 14:30 EDT".
    pub fn instant_label(&self, ts: i64) -> Result<String, TimeError> {
        match self.tz.timestamp_millis_opt(ts) {
            LocalResult::Single(dt) => Ok(dt.format("%Y-%m-%d %H:%M %Z").to_string()),
            _ => Err(TimeError::InvalidInstant(ts.to_string())),
        }
    }
}

impl Default for TimeZoneNormalizer {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn eastern() -> TimeZoneNormalizer {
        TimeZoneNormalizer::default()
    }

    #[test]
    fn roundtrips_a_plain_instant() {
        let normalizer = eastern();
        let day = Day {
            year: 2026,
            month: 8,
            day: 3,
        };
        let time = LocalTime::new(9, 0);
        let ts = normalizer.to_instant(&day, &time).unwrap();

        // 9:00 EDT == 13:00 UTC
        let expected = Utc
            .with_ymd_and_hms(2026, 8, 3, 13, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(ts, expected);

        let (local_day, local_time) = normalizer.to_local(ts).unwrap();
        assert_eq!(local_day, day);
        assert_eq!(local_time, time);
    }

    #[test]
    fn winter_and_summer_offsets_differ() {
        let normalizer = eastern();
        let time = LocalTime::new(9, 0);
        let summer = normalizer
            .to_instant(
                &Day {
                    year: 2026,
                    month: 8,
                    day: 3,
                },
                &time,
            )
            .unwrap();
        let winter = normalizer
            .to_instant(
                &Day {
                    year: 2026,
                    month: 1,
                    day: 5,
                },
                &time,
            )
            .unwrap();

        let summer_utc = Utc.timestamp_millis_opt(summer).unwrap();
        let winter_utc = Utc.timestamp_millis_opt(winter).unwrap();
        assert_eq!(summer_utc.hour(), 13); // EDT, UTC-4
        assert_eq!(winter_utc.hour(), 14); // EST, UTC-5
    }

    #[test]
    fn nonexistent_local_time_is_an_error() {
        // 2026-03-08 02:30 does not exist in America/New_York
        let res = eastern().to_instant(
            &Day {
                year: 2026,
                month: 3,
                day: 8,
            },
            &LocalTime::new(2, 30),
        );
        assert!(res.is_err());
    }

    #[test]
    fn ambiguous_local_time_resolves_to_earlier_offset() {
        // 2026-11-01 01:30 happens twice; the earlier pass is still EDT
        let ts = eastern()
            .to_instant(
                &Day {
                    year: 2026,
                    month: 11,
                    day: 1,
                },
                &LocalTime::new(1, 30),
            )
            .unwrap();
        let expected = Utc
            .with_ymd_and_hms(2026, 11, 1, 5, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(ts, expected);
    }

    #[test]
    fn rejects_invalid_local_inputs() {
        let normalizer = eastern();
        assert!(normalizer
            .to_instant(
                &Day {
                    year: 2026,
                    month: 2,
                    day: 30,
                },
                &LocalTime::new(9, 0)
            )
            .is_err());
        assert!(normalizer
            .to_instant(
                &Day {
                    year: 2026,
                    month: 8,
                    day: 3,
                },
                &LocalTime::new(25, 0)
            )
            .is_err());
    }
}
