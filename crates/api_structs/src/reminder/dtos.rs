use sage_scheduler_domain::ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ReminderOutcomeKind {
    Sent,
    Skipped,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOutcomeDTO {
    pub contact_id: ID,
    pub outcome: ReminderOutcomeKind,
    /// Which escalation step went out, for `sent` outcomes.
    pub stage: Option<u8>,
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRunReportDTO {
    pub dry_run: bool,
    pub sent: usize,
    pub skipped: usize,
    pub errors: usize,
    pub outcomes: Vec<ReminderOutcomeDTO>,
}
