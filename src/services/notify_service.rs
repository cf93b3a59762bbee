use async_trait::async_trait;
use tracing::warn;

/// Outbound notification channel.
///
/// Delivery is best-effort and fire-and-forget: implementations log failures
/// and never surface them, since the state a notification reports (e.g. a
/// consumed match) is already durable by the time it is sent.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: i64, message: &str);
}

/// Posts notifications to an HTTP webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl WebhookNotifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Reads `NOTIFY_WEBHOOK_URL`; absent means notifications are disabled.
    pub fn from_env() -> Option<Self> {
        std::env::var("NOTIFY_WEBHOOK_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, user_id: i64, message: &str) {
        let url = format!("{}/notify", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "user_id": user_id,
            "message": message,
        });

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if !resp.status().is_success() => {
                warn!(
                    "Notification webhook non-OK for user {}: {}",
                    user_id,
                    resp.status()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Notification webhook unreachable for user {}: {}", user_id, e);
            }
        }
    }
}

/// Discards notifications. Used when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _user_id: i64, _message: &str) {}
}
