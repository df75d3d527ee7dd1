use serde::{Deserialize, Serialize};

/// Maximum number of intake reminders a contact will ever receive.
pub const MAX_REMINDER_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStage {
    First,
    Second,
    Third,
}

impl ReminderStage {
    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    fn for_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }
}

/// Quiet periods between escalation steps, in millis. `delay_after(count)` is
/// the time that must pass after the previous touchpoint (contact creation
/// when no reminder has been sent yet) before the next reminder is due.
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    pub first_after: i64,
    pub second_after: i64,
    pub third_after: i64,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        const HOUR: i64 = 1000 * 60 * 60;
        Self {
            first_after: 24 * HOUR,
            second_after: 48 * HOUR,
            third_after: 168 * HOUR,
        }
    }
}

impl ReminderSchedule {
    pub fn delay_after(&self, count: u8) -> Option<i64> {
        match count {
            0 => Some(self.first_after),
            1 => Some(self.second_after),
            2 => Some(self.third_after),
            _ => None,
        }
    }
}

/// The reminder projection embedded in a `Contact`. `count` only ever grows
/// and is capped at `MAX_REMINDER_COUNT`; once `intake_completed` flips the
/// escalation is over for good.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderState {
    pub count: u8,
    pub last_sent_at: Option<i64>,
    pub intake_completed: bool,
}

impl Default for ReminderState {
    fn default() -> Self {
        Self {
            count: 0,
            last_sent_at: None,
            intake_completed: false,
        }
    }
}

impl ReminderState {
    /// Pure transition function: which reminder, if any, is due at `now` for
    /// a contact created at `contact_created`. It reads exactly the fields a
    /// successful send updates, which is what makes a batch run safe to
    /// repeat: re-running before the next threshold elapses re-derives
    /// "not due yet".
    pub fn due_stage(
        &self,
        contact_created: i64,
        now: i64,
        schedule: &ReminderSchedule,
    ) -> Option<ReminderStage> {
        if self.intake_completed || self.count >= MAX_REMINDER_COUNT {
            return None;
        }
        let quiet_period = schedule.delay_after(self.count)?;
        let anchor = if self.count == 0 {
            contact_created
        } else {
            self.last_sent_at?
        };
        if now - anchor >= quiet_period {
            ReminderStage::for_count(self.count + 1)
        } else {
            None
        }
    }

    pub fn record_sent(&mut self, now: i64) {
        self.count = (self.count + 1).min(MAX_REMINDER_COUNT);
        self.last_sent_at = Some(now);
    }
}
