pub mod run_reminder_batch {
    use crate::dtos::ReminderRunReportDTO;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// Classify without sending or mutating anything.
        pub dry_run: Option<bool>,
    }

    pub type APIResponse = ReminderRunReportDTO;
}
