use super::{INotifier, NotificationPayload};
use crate::config::NotifierRelayConfig;
use tracing::error;

/// Delivers notification payloads by POSTing them to the configured relay,
/// which owns the actual email/SMS dispatch.
pub struct WebhookNotifier {
    client: reqwest::Client,
    relay: NotifierRelayConfig,
}

impl WebhookNotifier {
    pub fn new(relay: NotifierRelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay,
        }
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn send(&self, payload: &NotificationPayload) -> bool {
        let res = self
            .client
            .post(self.relay.url.clone())
            .header("sage-relay-key", &self.relay.key)
            .json(payload)
            .send()
            .await;

        match res {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                error!(
                    "Notification relay rejected payload for {}: {}",
                    payload.recipient(),
                    res.status()
                );
                false
            }
            Err(e) => {
                error!(
                    "Error delivering notification for {} to relay: {:?}",
                    payload.recipient(),
                    e
                );
                false
            }
        }
    }
}
