use super::{INotifier, NotificationPayload};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Records payloads instead of delivering them. Used by tests, which can also
/// flip `fail_sends` to exercise the dispatch-failure paths.
pub struct InMemoryNotifier {
    sent: Mutex<Vec<NotificationPayload>>,
    fail_sends: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn send(&self, payload: &NotificationPayload) -> bool {
        if self.fail_sends.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().unwrap().push(payload.clone());
        true
    }
}
