use crate::date::weekday_from_sunday_number;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Max windows kept per weekday, everything beyond is discarded.
const MAX_WINDOWS_PER_WEEKDAY: usize = 10;

/// A wall-clock time of day in the practice's business timezone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub hours: u32,
    pub minutes: u32,
}

impl LocalTime {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    pub fn minutes_of_day(&self) -> u32 {
        self.hours * 60 + self.minutes
    }

    pub fn from_minutes_of_day(minutes: u32) -> Self {
        Self {
            hours: minutes / 60,
            minutes: minutes % 60,
        }
    }

    pub fn to_twelve_hour_label(&self) -> String {
        let (hours, meridiem) = match self.hours {
            0 => (12, "AM"),
            1..=11 => (self.hours, "AM"),
            12 => (12, "PM"),
            _ => (self.hours - 12, "PM"),
        };
        format!("{}:{:02} {}", hours, self.minutes, meridiem)
    }
}

impl std::cmp::PartialOrd for LocalTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match self.hours.cmp(&other.hours) {
            std::cmp::Ordering::Less => return Some(std::cmp::Ordering::Less),
            std::cmp::Ordering::Greater => return Some(std::cmp::Ordering::Greater),
            _ => (),
        };

        Some(self.minutes.cmp(&other.minutes))
    }
}

impl std::fmt::Display for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// A recurring window of bookable time on one weekday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub start: LocalTime,
    pub end: LocalTime,
}

/// One configuration entry: a weekday (0=Sunday..6=Saturday) and its windows.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AvailabilityRule {
    pub weekday: u32,
    pub windows: Vec<AvailabilityWindow>,
}

/// The practice's recurring weekly availability: weekday -> ordered,
/// non-overlapping windows. Normalization at construction guarantees the
/// window invariants, so slot generation can walk them without re-checking.
#[derive(Debug, Clone)]
pub struct AvailabilityTemplate {
    by_weekday: [Vec<AvailabilityWindow>; 7],
}

impl AvailabilityTemplate {
    pub fn new(rules: Vec<AvailabilityRule>) -> Self {
        let mut by_weekday: [Vec<AvailabilityWindow>; 7] = Default::default();
        for rule in rules {
            if weekday_from_sunday_number(rule.weekday).is_none() {
                continue;
            }
            by_weekday[rule.weekday as usize].extend(rule.windows);
        }
        for windows in by_weekday.iter_mut() {
            normalize_windows(windows);
        }
        Self { by_weekday }
    }

    pub fn windows_for(&self, weekday: Weekday) -> &[AvailabilityWindow] {
        &self.by_weekday[weekday.num_days_from_sunday() as usize]
    }

    pub fn has_windows(&self, weekday: Weekday) -> bool {
        !self.windows_for(weekday).is_empty()
    }
}

impl Default for AvailabilityTemplate {
    /// The hand-configured weekly template the practice runs on when no
    /// override is provided.
    fn default() -> Self {
        let morning = AvailabilityWindow {
            start: LocalTime::new(9, 0),
            end: LocalTime::new(12, 0),
        };
        let evening = AvailabilityWindow {
            start: LocalTime::new(16, 0),
            end: LocalTime::new(19, 30),
        };
        Self::new(vec![
            AvailabilityRule {
                weekday: 1,
                windows: vec![morning.clone(), evening.clone()],
            },
            AvailabilityRule {
                weekday: 2,
                windows: vec![morning.clone(), evening],
            },
            AvailabilityRule {
                weekday: 3,
                windows: vec![morning],
            },
            AvailabilityRule {
                weekday: 4,
                windows: vec![AvailabilityWindow {
                    start: LocalTime::new(9, 0),
                    end: LocalTime::new(17, 0),
                }],
            },
            AvailabilityRule {
                weekday: 5,
                windows: vec![AvailabilityWindow {
                    start: LocalTime::new(9, 0),
                    end: LocalTime::new(14, 0),
                }],
            },
        ])
    }
}

/// Sorts windows by start, drops empty or inverted ones and merges overlaps,
/// so every stored window satisfies start < end and no two overlap.
fn normalize_windows(windows: &mut Vec<AvailabilityWindow>) {
    if windows.len() > MAX_WINDOWS_PER_WEEKDAY {
        windows.truncate(MAX_WINDOWS_PER_WEEKDAY);
    }
    // earliest start first
    windows.sort_by(|w1, w2| w1.start.partial_cmp(&w2.start).unwrap());
    windows.retain(|w| w.start < w.end);

    let mut merged: Vec<AvailabilityWindow> = Vec::with_capacity(windows.len());
    for window in windows.drain(..) {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => {
                if window.end > last.end {
                    last.end = window.end;
                }
            }
            _ => merged.push(window),
        }
    }
    *windows = merged;
}

#[cfg(test)]
mod test {
    use super::*;

    fn window(start: (u32, u32), end: (u32, u32)) -> AvailabilityWindow {
        AvailabilityWindow {
            start: LocalTime::new(start.0, start.1),
            end: LocalTime::new(end.0, end.1),
        }
    }

    #[test]
    fn local_time_ordering() {
        assert!(LocalTime::new(8, 30) < LocalTime::new(9, 0));
        assert!(LocalTime::new(9, 15) > LocalTime::new(9, 0));
        assert_eq!(LocalTime::new(9, 0), LocalTime::new(9, 0));
    }

    #[test]
    fn twelve_hour_labels() {
        assert_eq!(LocalTime::new(0, 0).to_twelve_hour_label(), "12:00 AM");
        assert_eq!(LocalTime::new(9, 5).to_twelve_hour_label(), "9:05 AM");
        assert_eq!(LocalTime::new(12, 0).to_twelve_hour_label(), "12:00 PM");
        assert_eq!(LocalTime::new(16, 30).to_twelve_hour_label(), "4:30 PM");
    }

    #[test]
    fn sorts_and_merges_overlapping_windows() {
        let template = AvailabilityTemplate::new(vec![AvailabilityRule {
            weekday: 1,
            windows: vec![
                window((10, 30), (12, 30)),
                window((8, 30), (9, 0)),
                window((20, 30), (21, 0)),
                window((20, 45), (21, 50)),
                window((21, 50), (22, 50)),
            ],
        }]);

        assert_eq!(
            template.windows_for(chrono::Weekday::Mon),
            &[
                window((8, 30), (9, 0)),
                window((10, 30), (12, 30)),
                window((20, 30), (22, 50)),
            ]
        );
    }

    #[test]
    fn drops_inverted_windows() {
        let template = AvailabilityTemplate::new(vec![AvailabilityRule {
            weekday: 2,
            windows: vec![window((14, 0), (14, 0)), window((15, 0), (13, 0))],
        }]);
        assert!(!template.has_windows(chrono::Weekday::Tue));
    }

    #[test]
    fn ignores_out_of_range_weekday() {
        let template = AvailabilityTemplate::new(vec![AvailabilityRule {
            weekday: 9,
            windows: vec![window((9, 0), (10, 0))],
        }]);
        for weekday in &[
            chrono::Weekday::Sun,
            chrono::Weekday::Mon,
            chrono::Weekday::Sat,
        ] {
            assert!(!template.has_windows(*weekday));
        }
    }

    #[test]
    fn default_template_has_weekday_service_only() {
        let template = AvailabilityTemplate::default();
        assert!(template.has_windows(chrono::Weekday::Mon));
        assert!(template.has_windows(chrono::Weekday::Thu));
        assert!(template.has_windows(chrono::Weekday::Fri));
        assert!(!template.has_windows(chrono::Weekday::Sat));
        assert!(!template.has_windows(chrono::Weekday::Sun));
    }
}
