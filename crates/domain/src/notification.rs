use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A record feeding the dashboard notification bell: bookings, cancellations
/// and reminder sends all drop one of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardNotification {
    pub id: ID,
    pub contact_id: ID,
    pub message: String,
    pub seen: bool,
    pub created: i64,
}

impl DashboardNotification {
    pub fn new(contact_id: ID, message: String, now: i64) -> Self {
        Self {
            id: Default::default(),
            contact_id,
            message,
            seen: false,
            created: now,
        }
    }
}

impl Entity for DashboardNotification {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
