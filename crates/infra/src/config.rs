use chrono_tz::Tz;
use sage_scheduler_domain::date::weekday_from_sunday_number;
use sage_scheduler_domain::{
    AvailabilityRule, AvailabilityTemplate, ReminderSchedule, SchedulingPolicy,
    DEFAULT_SLOT_DURATION_MILLIS,
};
use tracing::{info, warn};
use url::Url;

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

#[derive(Debug, Clone)]
pub struct NotifierRelayConfig {
    /// Where notification payloads are POSTed for delivery.
    pub url: Url,
    /// Shared secret sent along so the relay can authenticate us.
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Maximum allowed duration in millis for querying booking slots.
    /// This is used to avoid having clients ask for slots in a timespan of
    /// several months which will take a lot of time to compute and is also
    /// not very useful information to query about anyways.
    pub booking_slots_query_duration_limit: i64,
    /// The practice's fixed business timezone. Availability windows and all
    /// user-facing labels are wall-clock times in this zone.
    pub timezone: Tz,
    /// Slot duration in millis.
    pub slot_duration: i64,
    pub scheduling: SchedulingPolicy,
    pub reminder_schedule: ReminderSchedule,
    pub availability: AvailabilityTemplate,
    /// Recipient of the admin-facing calendar notifications.
    pub admin_email: String,
    /// Location line carried on admin calendar events.
    pub practice_location: String,
    pub notifier_relay: Option<NotifierRelayConfig>,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given BUSINESS_TIMEZONE: {} is not a valid IANA timezone, falling back to America/New_York.",
                        tz
                    );
                    chrono_tz::America::New_York
                }
            },
            Err(_) => chrono_tz::America::New_York,
        };

        let admin_email = match std::env::var("ADMIN_EMAIL") {
            Ok(email) => email,
            Err(_) => {
                info!("Did not find ADMIN_EMAIL environment variable. Admin notifications go to the office inbox default.");
                "office@sagetherapy.example".into()
            }
        };
        let practice_location =
            std::env::var("PRACTICE_LOCATION").unwrap_or_else(|_| "Sage Therapy Office".into());

        Self {
            port,
            booking_slots_query_duration_limit: 1000 * 60 * 60 * 24 * 14, // 14 days
            timezone,
            slot_duration: env_minutes("SLOT_DURATION_MINUTES", DEFAULT_SLOT_DURATION_MILLIS),
            scheduling: scheduling_policy_from_env(),
            reminder_schedule: reminder_schedule_from_env(),
            availability: availability_from_env(),
            admin_email,
            practice_location,
            notifier_relay: notifier_relay_from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_minutes(name: &str, default_millis: i64) -> i64 {
    match std::env::var(name) {
        Ok(val) => match val.parse::<i64>() {
            Ok(mins) if mins > 0 => mins * 1000 * 60,
            _ => {
                warn!("The given {}: {} is not valid, falling back to the default.", name, val);
                default_millis
            }
        },
        Err(_) => default_millis,
    }
}

fn scheduling_policy_from_env() -> SchedulingPolicy {
    let mut policy = SchedulingPolicy::default();
    if let Ok(val) = std::env::var("MIN_LEAD_TIME_HOURS") {
        match val.parse::<i64>() {
            Ok(hours) if hours >= 0 => policy.min_lead_time_millis = hours * HOUR_MILLIS,
            _ => warn!("The given MIN_LEAD_TIME_HOURS: {} is not valid, keeping the default.", val),
        }
    }
    if let Ok(val) = std::env::var("BOOKING_HORIZON_BUSINESS_DAYS") {
        match val.parse::<u32>() {
            Ok(days) if days > 0 => policy.horizon_business_days = days,
            _ => warn!(
                "The given BOOKING_HORIZON_BUSINESS_DAYS: {} is not valid, keeping the default.",
                val
            ),
        }
    }
    // comma-separated weekday numbers, 0=Sunday .. 6=Saturday
    if let Ok(val) = std::env::var("SAME_DAY_RESCHEDULE_WEEKDAYS") {
        let weekdays = val
            .split(',')
            .filter_map(|part| part.trim().parse::<u32>().ok())
            .filter_map(weekday_from_sunday_number)
            .collect::<Vec<_>>();
        if weekdays.is_empty() && !val.trim().is_empty() {
            warn!(
                "The given SAME_DAY_RESCHEDULE_WEEKDAYS: {} is not valid, keeping the default.",
                val
            );
        } else {
            policy.same_day_reschedule_weekdays = weekdays;
        }
    }
    policy
}

fn reminder_schedule_from_env() -> ReminderSchedule {
    // comma-separated hours for the three escalation delays, e.g. "24,48,168"
    match std::env::var("REMINDER_DELAYS_HOURS") {
        Ok(val) => {
            let delays = val
                .split(',')
                .filter_map(|part| part.trim().parse::<i64>().ok())
                .collect::<Vec<_>>();
            match delays.as_slice() {
                [first, second, third] if delays.iter().all(|d| *d > 0) => ReminderSchedule {
                    first_after: first * HOUR_MILLIS,
                    second_after: second * HOUR_MILLIS,
                    third_after: third * HOUR_MILLIS,
                },
                _ => {
                    warn!(
                        "The given REMINDER_DELAYS_HOURS: {} is not valid, keeping the default.",
                        val
                    );
                    ReminderSchedule::default()
                }
            }
        }
        Err(_) => ReminderSchedule::default(),
    }
}

fn availability_from_env() -> AvailabilityTemplate {
    // JSON list of { "weekday": 1, "windows": [{ "start": { "hours": 9, "minutes": 0 }, ... }] }
    match std::env::var("AVAILABILITY_RULES") {
        Ok(val) => match serde_json::from_str::<Vec<AvailabilityRule>>(&val) {
            Ok(rules) => AvailabilityTemplate::new(rules),
            Err(e) => {
                warn!(
                    "The given AVAILABILITY_RULES could not be parsed ({}), keeping the default weekly template.",
                    e
                );
                AvailabilityTemplate::default()
            }
        },
        Err(_) => AvailabilityTemplate::default(),
    }
}

fn notifier_relay_from_env() -> Option<NotifierRelayConfig> {
    let url = match std::env::var("NOTIFIER_RELAY_URL") {
        Ok(url) => url,
        Err(_) => {
            info!("Did not find NOTIFIER_RELAY_URL environment variable. Outbound notifications will only be logged.");
            return None;
        }
    };
    let url = match Url::parse(&url) {
        Ok(url) => url,
        Err(_) => {
            warn!("The given NOTIFIER_RELAY_URL: {} is not a valid url, outbound notifications will only be logged.", url);
            return None;
        }
    };
    let key = match std::env::var("NOTIFIER_RELAY_KEY") {
        Ok(key) => key,
        Err(_) => {
            warn!("Did not find NOTIFIER_RELAY_KEY environment variable. Outbound notifications will only be logged.");
            return None;
        }
    };
    Some(NotifierRelayConfig { url, key })
}
