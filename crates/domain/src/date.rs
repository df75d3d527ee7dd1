use crate::availability::LocalTime;
use chrono::prelude::*;
use std::str::FromStr;

pub fn is_valid_date(datestr: &str) -> anyhow::Result<(i32, u32, u32)> {
    let datestr = String::from(datestr);
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr));
    }
    let year = dates[0].parse();
    let month = dates[1].parse();
    let day = dates[2].parse();

    if year.is_err() || month.is_err() || day.is_err() {
        return Err(anyhow::Error::msg(datestr));
    }

    let year = year.unwrap();
    let month = month.unwrap();
    let day = day.unwrap();
    if !(1970..=2100).contains(&year) || month < 1 || month > 12 {
        return Err(anyhow::Error::msg(datestr));
    }

    let month_length = get_month_length(year, month);

    if day < 1 || day > month_length {
        return Err(anyhow::Error::msg(datestr));
    }

    Ok((year, month, day))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month - 1 {
        0 => 31,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        2 => 31,
        3 => 30,
        4 => 31,
        5 => 30,
        6 => 31,
        7 => 31,
        8 => 30,
        9 => 31,
        10 => 30,
        11 => 31,
        _ => panic!("Invalid month"),
    }
}

/// Weekday for the conventional 0=Sunday..6=Saturday numbering used by
/// availability configuration.
pub fn weekday_from_sunday_number(number: u32) -> Option<Weekday> {
    match number {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Human label for a bookable slot, e.g. "Monday, August 3 at 9:00 AM".
pub fn format_slot_label(day: &Day, time: &LocalTime) -> String {
    match day.naive() {
        Some(date) => format!(
            "{} at {}",
            date.format("%A, %B %-d"),
            time.to_twelve_hour_label()
        ),
        None => format!("{} at {}", day, time.to_twelve_hour_label()),
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Day {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl FromStr for Day {
    type Err = ();

    fn from_str(datestr: &str) -> Result<Self, Self::Err> {
        is_valid_date(datestr)
            .map(|(year, month, day)| Day { year, month, day })
            .map_err(|_| ())
    }
}

impl Day {
    pub fn inc(&mut self) {
        if self.day == get_month_length(self.year, self.month) {
            self.day = 1;
            if self.month == 12 {
                self.month = 1;
                self.year += 1;
            } else {
                self.month += 1;
            }
        } else {
            self.day += 1;
        }
    }

    pub fn naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn weekday(&self) -> Weekday {
        self.naive().expect("Day out of calendar range").weekday()
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl std::cmp::PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match self.year.cmp(&other.year) {
            std::cmp::Ordering::Less => return Some(std::cmp::Ordering::Less),
            std::cmp::Ordering::Greater => return Some(std::cmp::Ordering::Greater),
            _ => (),
        };
        match self.month.cmp(&other.month) {
            std::cmp::Ordering::Less => return Some(std::cmp::Ordering::Less),
            std::cmp::Ordering::Greater => return Some(std::cmp::Ordering::Greater),
            _ => (),
        };
        Some(self.day.cmp(&other.day))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn day_sanity_tests() {
        let mut day = Day {
            year: 2026,
            month: 1,
            day: 1,
        };
        day.inc();
        assert_eq!(
            day,
            Day {
                year: 2026,
                month: 1,
                day: 2
            }
        );
        let mut day = Day {
            year: 2026,
            month: 1,
            day: 31,
        };
        day.inc();
        assert_eq!(
            day,
            Day {
                year: 2026,
                month: 2,
                day: 1
            }
        );
        let mut day = Day {
            year: 2026,
            month: 12,
            day: 31,
        };
        day.inc();
        assert_eq!(
            day,
            Day {
                year: 2027,
                month: 1,
                day: 1
            }
        );
        for _ in 0..365 {
            day.inc();
        }
        assert_eq!(
            day,
            Day {
                year: 2028,
                month: 1,
                day: 1
            }
        );
    }

    #[test]
    fn computes_weekday() {
        // 2026-08-03 is a Monday
        let day = Day {
            year: 2026,
            month: 8,
            day: 3,
        };
        assert_eq!(day.weekday(), Weekday::Mon);
        let day = Day {
            year: 2026,
            month: 8,
            day: 8,
        };
        assert_eq!(day.weekday(), Weekday::Sat);
    }

    #[test]
    fn validates_dates() {
        assert!(is_valid_date("2026-8-3").is_ok());
        assert!(is_valid_date("2024-2-29").is_ok());
        assert!(is_valid_date("2026-2-29").is_err());
        assert!(is_valid_date("2026-13-1").is_err());
        assert!(is_valid_date("garbage").is_err());
    }

    #[test]
    fn maps_sunday_numbering() {
        assert_eq!(weekday_from_sunday_number(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_sunday_number(4), Some(Weekday::Thu));
        assert_eq!(weekday_from_sunday_number(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_sunday_number(7), None);
    }
}
