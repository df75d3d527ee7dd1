use crate::appointment::Appointment;
use crate::reminder::ReminderState;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

pub const STATUS_NEW_LEAD: &str = "new lead";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeAnswer {
    pub question: String,
    pub answer: String,
}

/// A lead/client record. The appointment and reminder projections live on the
/// contact itself; the scheduler and the reminder engine mutate them through
/// single-record reads and writes.
#[derive(Debug, Clone)]
pub struct Contact {
    pub id: ID,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub intake_answers: Vec<IntakeAnswer>,
    pub appointment: Option<Appointment>,
    pub reminders: ReminderState,
    /// Free-text audit log; every scheduler/reminder action appends a
    /// timestamped line.
    pub notes: String,
    /// Coarse label shown on the dashboard contact list.
    pub status_label: String,
    pub created: i64,
    pub updated: i64,
}

impl Contact {
    pub fn new(full_name: String, email: String, now: i64) -> Self {
        Self {
            id: Default::default(),
            full_name,
            email,
            phone: None,
            intake_answers: Vec::new(),
            appointment: None,
            reminders: Default::default(),
            notes: String::new(),
            status_label: STATUS_NEW_LEAD.into(),
            created: now,
            updated: now,
        }
    }

    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }

    pub fn append_note(&mut self, line: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(line);
    }

    /// The appointment currently claiming a slot, if any.
    pub fn active_appointment(&self) -> Option<&Appointment> {
        self.appointment.as_ref().filter(|a| a.blocks_slot())
    }
}

impl Entity for Contact {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
